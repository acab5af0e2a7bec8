// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::reflect::kind::{Kind, WORD};
use crate::reflect::value::NativeMethod;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Round `offset` up to the next multiple of `align` (a power of two).
#[inline]
pub(crate) const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Handle to a runtime type.
///
/// Equality and hashing are by identity: two handles are equal only if they
/// were cloned from the same [`Type`]. Two separately built types with the
/// same shape are distinct types.
#[derive(Clone)]
pub struct Type(Arc<TypeDescriptor>);

impl Type {
    /// Wrap a descriptor into a new, distinct type.
    pub fn new(desc: TypeDescriptor) -> Self {
        Self(Arc::new(desc))
    }

    pub(crate) fn from_arc(desc: Arc<TypeDescriptor>) -> Self {
        Self(desc)
    }

    /// Unnamed scalar type of the given kind.
    ///
    /// `kind` must be opaque (see [`Kind::is_opaque`]).
    pub fn scalar(kind: Kind) -> Self {
        Self::named_scalar(kind.name(), kind)
    }

    /// Named scalar type, e.g. `type Celsius float64`.
    pub fn named_scalar(name: impl Into<String>, kind: Kind) -> Self {
        debug_assert!(kind.is_opaque(), "{} is not a scalar kind", kind);
        Self::new(TypeDescriptor::new(name, TypeKind::Scalar(kind)))
    }

    /// Pointer type `*elem`.
    pub fn pointer_to(elem: &Type) -> Self {
        Self::new(TypeDescriptor::new(
            format!("*{}", elem.name()),
            TypeKind::Pointer(PointerDescriptor::to(elem.clone())),
        ))
    }

    /// Slice type `[]elem`.
    pub fn slice_of(elem: &Type) -> Self {
        Self::new(TypeDescriptor::new(
            format!("[]{}", elem.name()),
            TypeKind::Slice(elem.clone()),
        ))
    }

    /// Fixed-size array type `[len]elem`.
    pub fn array_of(elem: &Type, length: usize) -> Self {
        Self::new(TypeDescriptor::new(
            format!("[{}]{}", length, elem.name()),
            TypeKind::Array(ArrayDescriptor::new(elem.clone(), length)),
        ))
    }

    /// Map type `map[key]value`.
    pub fn map_of(key: &Type, value: &Type) -> Self {
        Self::new(TypeDescriptor::new(
            format!("map[{}]{}", key.name(), value.name()),
            TypeKind::Map {
                key: key.clone(),
                value: value.clone(),
            },
        ))
    }

    /// Channel type `chan elem`.
    pub fn chan_of(elem: &Type) -> Self {
        Self::new(TypeDescriptor::new(
            format!("chan {}", elem.name()),
            TypeKind::Chan(elem.clone()),
        ))
    }

    /// Interface type.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeDescriptor::new(name, TypeKind::Interface))
    }

    /// Get the descriptor.
    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    /// Address of the descriptor, stable for the lifetime of the type.
    #[inline]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Kind tag.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.0.kind.kind()
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.size
    }

    /// Alignment in bytes.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.0.align
    }

    /// Element type of a pointer, slice, array or chan; value type of a map.
    ///
    /// Returns `None` for other kinds, and for a self-referencing pointer
    /// whose struct has been dropped.
    pub fn elem(&self) -> Option<Type> {
        match &self.0.kind {
            TypeKind::Pointer(ptr) => ptr.elem(),
            TypeKind::Slice(elem) | TypeKind::Chan(elem) => Some(elem.clone()),
            TypeKind::Array(arr) => Some(arr.element_type.clone()),
            TypeKind::Map { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    /// Key type of a map.
    pub fn key(&self) -> Option<&Type> {
        match &self.0.kind {
            TypeKind::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Length of an array type.
    pub fn array_len(&self) -> Option<usize> {
        match &self.0.kind {
            TypeKind::Array(arr) => Some(arr.length),
            _ => None,
        }
    }

    /// Struct fields in declaration order (empty for non-struct types).
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.0.fields().unwrap_or(&[])
    }

    /// Number of struct fields.
    #[inline]
    pub fn num_field(&self) -> usize {
        self.fields().len()
    }

    /// Struct field by index.
    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields().get(index)
    }

    /// Struct field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.field(name)
    }

    /// Methods declared on this type.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.0.methods
    }

    /// Method by name.
    pub fn method_by_name(&self, name: &str) -> Option<&MethodDescriptor> {
        self.0.methods.iter().find(|m| m.name == name)
    }

    /// Follow pointer indirection down to the first non-pointer type.
    pub fn unpointer(&self) -> Type {
        let mut ty = self.clone();
        while let TypeKind::Pointer(ptr) = &ty.0.kind {
            match ptr.elem() {
                Some(elem) => ty = elem,
                None => break,
            }
        }
        ty
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({} {:#x}, {})", self.name(), self.id(), self.kind())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a type.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Scalar of an opaque kind.
    Scalar(Kind),
    /// Pointer.
    Pointer(PointerDescriptor),
    /// Slice (dynamic length, shared backing array).
    Slice(Type),
    /// Array (fixed length, stored inline).
    Array(ArrayDescriptor),
    /// Map.
    Map { key: Type, value: Type },
    /// Channel.
    Chan(Type),
    /// Interface (boxed value of any type).
    Interface,
    /// Struct with fields in declaration order.
    Struct(Vec<FieldDescriptor>),
}

impl TypeKind {
    /// Kind tag for this shape.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Scalar(kind) => *kind,
            Self::Pointer(_) => Kind::Pointer,
            Self::Slice(_) => Kind::Slice,
            Self::Array(_) => Kind::Array,
            Self::Map { .. } => Kind::Map,
            Self::Chan(_) => Kind::Chan,
            Self::Interface => Kind::Interface,
            Self::Struct(_) => Kind::Struct,
        }
    }
}

/// A complete type descriptor.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type shape.
    pub kind: TypeKind,
    /// Methods (value receiver).
    pub methods: Vec<MethodDescriptor>,
    size: usize,
    align: usize,
}

impl TypeDescriptor {
    /// Create a new type descriptor; size and alignment are computed from the shape.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let (size, align) = Self::layout(&kind);
        Self {
            name: name.into(),
            kind,
            methods: Vec::new(),
            size,
            align,
        }
    }

    /// Attach methods.
    pub fn with_methods(mut self, methods: Vec<MethodDescriptor>) -> Self {
        self.methods = methods;
        self
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    fn layout(kind: &TypeKind) -> (usize, usize) {
        match kind {
            TypeKind::Scalar(k) => (k.size().unwrap_or(WORD), k.alignment().unwrap_or(WORD)),
            TypeKind::Pointer(_) | TypeKind::Map { .. } | TypeKind::Chan(_) => (WORD, WORD),
            TypeKind::Slice(_) => (3 * WORD, WORD),
            TypeKind::Interface => (2 * WORD, WORD),
            TypeKind::Array(arr) => (
                arr.element_type.size() * arr.length,
                arr.element_type.alignment(),
            ),
            TypeKind::Struct(fields) => {
                let align = fields
                    .iter()
                    .map(|f| f.ty.alignment())
                    .max()
                    .unwrap_or(1);
                let end = fields
                    .last()
                    .map(|f| f.offset + f.ty.size())
                    .unwrap_or(0);
                (align_up(end, align), align)
            }
        }
    }
}

/// Pointer type descriptor.
///
/// The pointee is either held strongly or, for a struct pointing back to
/// itself, weakly (the struct owns the pointer type through its field).
#[derive(Clone)]
pub struct PointerDescriptor {
    elem: ElemRef,
}

#[derive(Clone)]
enum ElemRef {
    Strong(Type),
    Cycle(Weak<TypeDescriptor>),
}

impl PointerDescriptor {
    /// Pointer to an existing type.
    pub fn to(elem: Type) -> Self {
        Self {
            elem: ElemRef::Strong(elem),
        }
    }

    pub(crate) fn cycle(elem: Weak<TypeDescriptor>) -> Self {
        Self {
            elem: ElemRef::Cycle(elem),
        }
    }

    /// Pointee type.
    pub fn elem(&self) -> Option<Type> {
        match &self.elem {
            ElemRef::Strong(ty) => Some(ty.clone()),
            ElemRef::Cycle(weak) => weak.upgrade().map(Type::from_arc),
        }
    }
}

impl fmt::Debug for PointerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem {
            ElemRef::Strong(ty) => write!(f, "PointerDescriptor({})", ty.name()),
            ElemRef::Cycle(_) => f.write_str("PointerDescriptor(<self>)"),
        }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Type,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element_type: Type, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: Type,
    /// Byte offset from the start of the struct.
    pub offset: usize,
    /// Position among the struct's fields.
    pub index: usize,
    /// Whether code outside the declaring module may read the field.
    pub exported: bool,
}

/// Method with a value receiver.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Implementation; receives the receiver and the call arguments.
    pub func: NativeMethod,
}

impl MethodDescriptor {
    /// Create method descriptor.
    pub fn new(name: impl Into<String>, func: NativeMethod) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Type::scalar(Kind::Int);
        let b = Type::scalar(Kind::Int);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.kind(), b.kind());
    }

    #[test]
    fn test_composite_names() {
        let int = Type::scalar(Kind::Int);
        let string = Type::scalar(Kind::String);
        assert_eq!(Type::pointer_to(&int).name(), "*int");
        assert_eq!(Type::slice_of(&int).name(), "[]int");
        assert_eq!(Type::array_of(&int, 4).name(), "[4]int");
        assert_eq!(Type::map_of(&string, &int).name(), "map[string]int");
        assert_eq!(Type::chan_of(&int).name(), "chan int");
    }

    #[test]
    fn test_elem_and_len() {
        let u8_type = Type::scalar(Kind::Uint8);
        let arr = Type::array_of(&u8_type, 16);
        assert_eq!(arr.kind(), Kind::Array);
        assert_eq!(arr.array_len(), Some(16));
        assert_eq!(arr.elem(), Some(u8_type.clone()));
        assert_eq!(arr.size(), 16);
        assert_eq!(u8_type.elem(), None);
        assert_eq!(u8_type.array_len(), None);
    }

    #[test]
    fn test_unpointer() {
        let int = Type::scalar(Kind::Int);
        let pp = Type::pointer_to(&Type::pointer_to(&int));
        assert_eq!(pp.name(), "**int");
        assert_eq!(pp.unpointer(), int);
        assert_eq!(int.unpointer(), int);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(9, 4), 12);
        assert_eq!(align_up(16, 16), 16);
    }
}
