// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for struct types.

use crate::reflect::kind::Kind;
use crate::reflect::type_descriptor::{
    align_up, FieldDescriptor, MethodDescriptor, PointerDescriptor, Type, TypeDescriptor,
    TypeKind,
};
use crate::reflect::value::NativeMethod;
use std::sync::{Arc, Weak};

#[derive(Debug)]
enum PendingType {
    Typed(Type),
    SelfPointer,
}

#[derive(Debug)]
struct PendingField {
    name: String,
    ty: PendingType,
    exported: bool,
}

/// Builder for struct types.
///
/// Field offsets follow natural alignment in declaration order, and the
/// struct size is rounded up to its alignment.
///
/// ```rust
/// use hdds_clone::reflect::{Kind, StructBuilder, Type};
///
/// let point = StructBuilder::new("Point")
///     .field("X", Type::scalar(Kind::Int32))
///     .field("Y", Type::scalar(Kind::Int32))
///     .private_field("label", Type::scalar(Kind::String))
///     .build();
///
/// assert_eq!(point.num_field(), 3);
/// assert_eq!(point.field(2).map(|f| f.offset), Some(8));
/// ```
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Vec<PendingField>,
    methods: Vec<MethodDescriptor>,
}

impl StructBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add an exported field.
    pub fn field(self, name: impl Into<String>, ty: Type) -> Self {
        self.push(name, PendingType::Typed(ty), true)
    }

    /// Add an unexported field. Its value can be inspected but not read
    /// through [`Value::get`](crate::reflect::Value::get).
    pub fn private_field(self, name: impl Into<String>, ty: Type) -> Self {
        self.push(name, PendingType::Typed(ty), false)
    }

    /// Add a scalar field of the given kind.
    pub fn scalar_field(self, name: impl Into<String>, kind: Kind) -> Self {
        self.field(name, Type::scalar(kind))
    }

    /// Add a field pointing to the struct being built (`next *Node`).
    pub fn self_pointer_field(self, name: impl Into<String>, exported: bool) -> Self {
        self.push(name, PendingType::SelfPointer, exported)
    }

    /// Add a method with a value receiver.
    pub fn method(mut self, name: impl Into<String>, func: NativeMethod) -> Self {
        self.methods.push(MethodDescriptor::new(name, func));
        self
    }

    fn push(mut self, name: impl Into<String>, ty: PendingType, exported: bool) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            ty,
            exported,
        });
        self
    }

    /// Build the struct type.
    pub fn build(self) -> Type {
        let Self {
            name,
            fields,
            methods,
        } = self;

        let desc = Arc::new_cyclic(|this: &Weak<TypeDescriptor>| {
            let self_name = format!("*{}", name);
            let mut offset = 0;
            let fields = fields
                .into_iter()
                .enumerate()
                .map(|(index, pending)| {
                    let ty = match pending.ty {
                        PendingType::Typed(ty) => ty,
                        PendingType::SelfPointer => Type::new(TypeDescriptor::new(
                            self_name.clone(),
                            TypeKind::Pointer(PointerDescriptor::cycle(this.clone())),
                        )),
                    };
                    let field_offset = align_up(offset, ty.alignment());
                    offset = field_offset + ty.size();
                    FieldDescriptor {
                        name: pending.name,
                        ty,
                        offset: field_offset,
                        index,
                        exported: pending.exported,
                    }
                })
                .collect();

            TypeDescriptor::new(name, TypeKind::Struct(fields)).with_methods(methods)
        });

        Type::from_arc(desc)
    }
}
