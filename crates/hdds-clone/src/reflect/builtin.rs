// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Well-known struct types.
//!
//! Each function returns the same [`Type`] handle on every call, so they can
//! be used as identity keys.

use crate::reflect::kind::Kind;
use crate::reflect::{StructBuilder, Type};
use std::sync::OnceLock;

/// Wall-clock timestamp: `time.Time { wall uint64, ext int64, loc *Location }`.
///
/// `loc` points to a zone descriptor shared by every timestamp in that zone
/// and never mutated after creation.
pub fn time_type() -> Type {
    static TIME: OnceLock<Type> = OnceLock::new();
    TIME
        .get_or_init(|| {
            StructBuilder::new("time.Time")
                .private_field("wall", Type::scalar(Kind::Uint64))
                .private_field("ext", Type::scalar(Kind::Int64))
                .private_field("loc", Type::pointer_to(&location_type()))
                .build()
        })
        .clone()
}

/// Zone descriptor referenced by [`time_type`].
pub fn location_type() -> Type {
    static LOCATION: OnceLock<Type> = OnceLock::new();
    LOCATION
        .get_or_init(|| {
            let zone = StructBuilder::new("time.zone")
                .private_field("name", Type::scalar(Kind::String))
                .private_field("offset", Type::scalar(Kind::Int))
                .private_field("isDST", Type::scalar(Kind::Bool))
                .build();

            StructBuilder::new("time.Location")
                .private_field("name", Type::scalar(Kind::String))
                .private_field("zone", Type::slice_of(&zone))
                .private_field("tx", Type::slice_of(&Type::scalar(Kind::Int64)))
                .build()
        })
        .clone()
}

/// Reflected-value wrapper: `reflect.Value { typ *rtype, ptr unsafe.Pointer, flag uintptr }`.
pub fn value_type() -> Type {
    static VALUE: OnceLock<Type> = OnceLock::new();
    VALUE
        .get_or_init(|| {
            let rtype = StructBuilder::new("reflect.rtype")
                .private_field("size", Type::scalar(Kind::Uintptr))
                .private_field("hash", Type::scalar(Kind::Uint32))
                .private_field("kind", Type::scalar(Kind::Uint8))
                .build();

            StructBuilder::new("reflect.Value")
                .private_field("typ", Type::pointer_to(&rtype))
                .private_field("ptr", Type::scalar(Kind::UnsafePointer))
                .private_field("flag", Type::scalar(Kind::Uintptr))
                .build()
        })
        .clone()
}
