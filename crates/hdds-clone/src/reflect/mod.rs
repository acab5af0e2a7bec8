// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type information.
//!
//! Types and values described at runtime, for code that must inspect data
//! without compile-time knowledge of its shape.
//!
//! # Features
//!
//! - **Kind**: closed set of type kinds, with the opaque-kind predicate
//! - **Type**: identity-keyed handle to a `TypeDescriptor` (struct fields with offsets, elements, methods)
//! - **StructBuilder**: fluent interface for building struct types
//! - **Value**: reflected value with field access and unexported-field protection
//!
//! # Example
//!
//! ```rust
//! use hdds_clone::reflect::{Kind, StructBuilder, Type, Value};
//!
//! let reading = StructBuilder::new("SensorReading")
//!     .scalar_field("SensorId", Kind::Uint32)
//!     .scalar_field("Temperature", Kind::Float64)
//!     .private_field("raw", Type::slice_of(&Type::scalar(Kind::Uint8)))
//!     .build();
//!
//! let value = Value::from_fields(
//!     &reading,
//!     vec![Value::from(42u32), Value::from(23.5f64), Value::zero(&reading.fields()[2].ty)],
//! )
//! .unwrap();
//!
//! assert_eq!(value.field(1).unwrap().get::<f64>().unwrap(), 23.5);
//! assert!(!value.field(2).unwrap().can_interface());
//! ```

pub mod builtin;

mod builder;
mod kind;
mod type_descriptor;
mod value;

pub use builder::StructBuilder;
pub use kind::{Kind, WORD};
pub use type_descriptor::{
    ArrayDescriptor, FieldDescriptor, MethodDescriptor, PointerDescriptor, Type, TypeDescriptor,
    TypeKind,
};
pub use value::{Complex128, Complex64, FromValue, NativeFn, NativeMethod, Value, ValueError};

pub(crate) use value::{FuncRepr, ValueData};
