// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reading scalar values out of unexported fields.
//!
//! A value reached through an unexported struct field is read-only: its raw
//! contents are visible but [`Value::get`] and [`Value::call`] refuse it.
//! [`copy_scalar_value`] rebuilds an independent, readable value with the
//! same type and contents.
//!
//! # Func fields
//!
//! A func value is rebuilt from its code address. Every bound method value
//! reports the same address (the shared dispatch stub), so the method and
//! receiver behind it cannot be recovered: those extract to a nil func.

use crate::reflect::{Complex64, FuncRepr, Kind, NativeFn, StructBuilder, Value, ValueData};
use std::sync::OnceLock;

/// Rebuild a readable copy of a scalar value.
///
/// Readable values are returned unchanged. `src` must be of an opaque kind
/// (see [`Kind::is_opaque`]).
///
/// # Panics
///
/// On any non-opaque kind. Callers only extract fields the classifier
/// reported as copyable by assignment.
///
/// ```rust
/// use hdds_clone::copy_scalar_value;
/// use hdds_clone::reflect::{Kind, StructBuilder, Type, Value};
///
/// let account = StructBuilder::new("Account")
///     .private_field("balance", Type::scalar(Kind::Int64))
///     .build();
/// let value = Value::from_fields(&account, vec![Value::from(250i64)]).unwrap();
///
/// let balance = value.field(0).unwrap();
/// assert!(balance.get::<i64>().is_err());
///
/// let copy = copy_scalar_value(balance);
/// assert_eq!(copy.get::<i64>().unwrap(), 250);
/// ```
pub fn copy_scalar_value(src: Value) -> Value {
    if src.can_interface() {
        return src;
    }

    let data = match (src.kind(), &src.data) {
        (Kind::Bool, ValueData::Bool(b)) => ValueData::Bool(*b),

        (Kind::Int, ValueData::Int(v)) => ValueData::Int(*v as isize as i64),
        (Kind::Int8, ValueData::Int(v)) => ValueData::Int(i64::from(*v as i8)),
        (Kind::Int16, ValueData::Int(v)) => ValueData::Int(i64::from(*v as i16)),
        (Kind::Int32, ValueData::Int(v)) => ValueData::Int(i64::from(*v as i32)),
        (Kind::Int64, ValueData::Int(v)) => ValueData::Int(*v),

        (Kind::Uint | Kind::Uintptr, ValueData::Uint(v)) => ValueData::Uint(*v as usize as u64),
        (Kind::Uint8, ValueData::Uint(v)) => ValueData::Uint(u64::from(*v as u8)),
        (Kind::Uint16, ValueData::Uint(v)) => ValueData::Uint(u64::from(*v as u16)),
        (Kind::Uint32, ValueData::Uint(v)) => ValueData::Uint(u64::from(*v as u32)),
        (Kind::Uint64, ValueData::Uint(v)) => ValueData::Uint(*v),

        (Kind::Float32, ValueData::Float(v)) => ValueData::Float(f64::from(*v as f32)),
        (Kind::Float64, ValueData::Float(v)) => ValueData::Float(*v),

        (Kind::Complex64, ValueData::Complex(c)) => {
            ValueData::Complex(Complex64::new(c.re as f32, c.im as f32).into())
        }
        (Kind::Complex128, ValueData::Complex(c)) => ValueData::Complex(*c),

        (Kind::String, ValueData::String(s)) => ValueData::String(s.clone()),
        (Kind::UnsafePointer, ValueData::UnsafePointer(addr)) => ValueData::UnsafePointer(*addr),

        (Kind::Func, _) => return copy_func(&src),

        _ => panic!(
            "hdds-clone: <bug> impossible type `{}` when cloning private field",
            src.ty()
        ),
    };

    Value::from_raw(src.ty().clone(), data)
}

fn copy_func(src: &Value) -> Value {
    let code = src.pointer().unwrap_or(0);
    if code == 0 {
        return Value::zero(src.ty());
    }

    if code == bait_method_pointer() {
        log::debug!(
            "[extract] method value of type {} cannot be rebuilt, using nil func",
            src.ty()
        );
        return Value::zero(src.ty());
    }

    // SAFETY: the only func values whose code address is not the method
    // dispatch stub are native functions, and that address is the `NativeFn`
    // pointer itself.
    let f = unsafe { std::mem::transmute::<usize, NativeFn>(code) };
    Value::from_raw(src.ty().clone(), ValueData::Func(Some(FuncRepr::Native(f))))
}

/// Code address reported by any bound method value.
fn bait_method_pointer() -> usize {
    static BAIT: OnceLock<usize> = OnceLock::new();
    *BAIT.get_or_init(|| {
        let bait = StructBuilder::new("baitType").method("Foo", bait_foo).build();
        Value::zero(&bait)
            .method_by_name("Foo")
            .and_then(|m| m.pointer())
            .unwrap_or(0)
    })
}

fn bait_foo(_recv: &Value, _args: &[Value]) -> Vec<Value> {
    Vec::new()
}
