// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind tags for runtime types.

use std::fmt;
use std::mem::size_of;

/// Machine word size on the host.
pub const WORD: usize = size_of::<usize>();

/// The closed set of kinds a [`Type`](crate::reflect::Type) can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Func,
    UnsafePointer,
    Array,
    Chan,
    Interface,
    Map,
    Pointer,
    Slice,
    Struct,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 26] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
        Self::Func,
        Self::UnsafePointer,
        Self::Array,
        Self::Chan,
        Self::Interface,
        Self::Map,
        Self::Pointer,
        Self::Slice,
        Self::Struct,
    ];

    /// Returns `true` if values of this kind are self-contained and never
    /// alias external mutable state, so they can be copied by assignment.
    ///
    /// Func values are included: a function is code, not data.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Uintptr
                | Self::Float32
                | Self::Float64
                | Self::Complex64
                | Self::Complex128
                | Self::String
                | Self::Func
                | Self::UnsafePointer
        )
    }

    /// Returns `true` for kinds whose values are (or contain) a reference
    /// to shared storage: pointer, slice, map, chan, interface.
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::Pointer | Self::Slice | Self::Map | Self::Chan | Self::Interface
        )
    }

    /// Lower-case kind name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::Func => "func",
            Self::UnsafePointer => "unsafe.Pointer",
            Self::Array => "array",
            Self::Chan => "chan",
            Self::Interface => "interface",
            Self::Map => "map",
            Self::Pointer => "ptr",
            Self::Slice => "slice",
            Self::Struct => "struct",
        }
    }

    /// Size in bytes on the host (None for arrays and structs, whose
    /// size depends on their shape).
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::Uint8 => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Uint64 | Self::Float64 | Self::Complex64 => Some(8),
            Self::Complex128 => Some(16),
            Self::Int
            | Self::Uint
            | Self::Uintptr
            | Self::Func
            | Self::UnsafePointer
            | Self::Pointer
            | Self::Map
            | Self::Chan => Some(WORD),
            // data pointer + length
            Self::String => Some(2 * WORD),
            // type word + data word
            Self::Interface => Some(2 * WORD),
            // data pointer + length + capacity
            Self::Slice => Some(3 * WORD),
            Self::Array | Self::Struct => None,
        }
    }

    /// Alignment requirement in bytes (None for arrays and structs).
    pub const fn alignment(self) -> Option<usize> {
        match self {
            Self::Complex64 => Some(4),
            Self::Complex128 => Some(8),
            Self::String | Self::Interface | Self::Slice => Some(WORD),
            Self::Array | Self::Struct => None,
            other => other.size(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
