// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflected values.
//!
//! A [`Value`] pairs a [`Type`] with its data. Values read out of an
//! unexported struct field are flagged read-only: their raw contents can be
//! inspected (`as_int`, `pointer`, ...) but typed reads ([`Value::get`]) and
//! calls are refused.

use crate::reflect::kind::Kind;
use crate::reflect::type_descriptor::{Type, TypeKind};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Native function: takes arguments, returns results.
pub type NativeFn = fn(&[Value]) -> Vec<Value>;

/// Native method: takes the receiver and the arguments.
pub type NativeMethod = fn(&Value, &[Value]) -> Vec<Value>;

type MethodValueCall = fn(&Value, NativeMethod, &[Value]) -> Vec<Value>;

/// Dispatch stub shared by every bound method value. Its address is what
/// [`Value::pointer`] reports for any method value, whatever the method.
static METHOD_VALUE_CALL: MethodValueCall = call_method_value;

fn call_method_value(receiver: &Value, method: NativeMethod, args: &[Value]) -> Vec<Value> {
    method(receiver, args)
}

#[inline]
fn method_value_code() -> usize {
    std::ptr::addr_of!(METHOD_VALUE_CALL) as usize
}

/// Complex number with `f32` parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

/// Complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

impl Complex128 {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl From<Complex64> for Complex128 {
    fn from(c: Complex64) -> Self {
        Self::new(f64::from(c.re), f64::from(c.im))
    }
}

/// Errors for value operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Value was obtained through an unexported field.
    Unexported { ty: String },
    TypeMismatch { expected: String, got: String },
    FieldIndexOutOfRange { index: usize, count: usize },
    FieldNotFound(String),
    ArityMismatch { expected: usize, got: usize },
    NotCallable(String),
    NilFunc,
}

impl ValueError {
    fn mismatch(expected: impl Into<String>, got: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.ty().name().to_string(),
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexported { ty } => {
                write!(f, "Cannot read value of type {} from unexported field", ty)
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::FieldIndexOutOfRange { index, count } => {
                write!(f, "Field index out of range: {} >= {}", index, count)
            }
            Self::FieldNotFound(name) => write!(f, "Field not found: {}", name),
            Self::ArityMismatch { expected, got } => {
                write!(f, "Wrong number of values: expected {}, got {}", expected, got)
            }
            Self::NotCallable(ty) => write!(f, "Value of type {} is not callable", ty),
            Self::NilFunc => write!(f, "Call of nil func value"),
        }
    }
}

impl std::error::Error for ValueError {}

#[derive(Clone)]
pub(crate) enum FuncRepr {
    Native(NativeFn),
    Method {
        receiver: Box<Value>,
        method: NativeMethod,
    },
}

impl FuncRepr {
    fn code(&self) -> usize {
        match self {
            Self::Native(f) => *f as usize,
            Self::Method { .. } => method_value_code(),
        }
    }
}

/// Raw storage. Integer, unsigned and float kinds share a widest-width slot;
/// the type's kind says how many bits are meaningful.
#[derive(Clone)]
pub(crate) enum ValueData {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex128),
    String(Arc<str>),
    Func(Option<FuncRepr>),
    UnsafePointer(usize),
    /// Pointer, slice, map, chan and interface values share their target.
    Reference(Option<Arc<RwLock<Value>>>),
    Array(Vec<Value>),
    Struct(Vec<Value>),
}

impl ValueData {
    fn zero(ty: &Type) -> Self {
        match &ty.descriptor().kind {
            TypeKind::Scalar(kind) => Self::zero_scalar(*kind),
            TypeKind::Pointer(_)
            | TypeKind::Slice(_)
            | TypeKind::Map { .. }
            | TypeKind::Chan(_)
            | TypeKind::Interface => Self::Reference(None),
            TypeKind::Array(arr) => {
                Self::Array(vec![Value::zero(&arr.element_type); arr.length])
            }
            TypeKind::Struct(fields) => {
                Self::Struct(fields.iter().map(|f| Value::zero(&f.ty)).collect())
            }
        }
    }

    fn zero_scalar(kind: Kind) -> Self {
        match kind {
            Kind::Bool => Self::Bool(false),
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => Self::Int(0),
            Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::Uintptr => Self::Uint(0),
            Kind::Float32 | Kind::Float64 => Self::Float(0.0),
            Kind::Complex64 | Kind::Complex128 => Self::Complex(Complex128::default()),
            Kind::String => Self::String(Arc::from("")),
            Kind::Func => Self::Func(None),
            Kind::UnsafePointer => Self::UnsafePointer(0),
            Kind::Array => Self::Array(Vec::new()),
            Kind::Struct => Self::Struct(Vec::new()),
            Kind::Chan | Kind::Interface | Kind::Map | Kind::Pointer | Kind::Slice => {
                Self::Reference(None)
            }
        }
    }
}

impl PartialEq for ValueData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Complex(a), Self::Complex(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => {
                a.as_ref().map(FuncRepr::code) == b.as_ref().map(FuncRepr::code)
            }
            (Self::UnsafePointer(a), Self::UnsafePointer(b)) => a == b,
            (Self::Reference(a), Self::Reference(b)) => match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            (Self::Array(a), Self::Array(b)) | (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

/// A reflected value.
#[derive(Clone)]
pub struct Value {
    ty: Type,
    pub(crate) data: ValueData,
    read_only: bool,
}

impl Value {
    pub(crate) fn from_raw(ty: Type, data: ValueData) -> Self {
        Self {
            ty,
            data,
            read_only: false,
        }
    }

    /// Zero value of a type: false, 0, "", nil, or the zero value of every
    /// element and field.
    pub fn zero(ty: &Type) -> Self {
        Self::from_raw(ty.clone(), ValueData::zero(ty))
    }

    /// Native function value of the unnamed `func` type.
    pub fn func(f: NativeFn) -> Self {
        Self::from_raw(Type::scalar(Kind::Func), ValueData::Func(Some(FuncRepr::Native(f))))
    }

    /// Raw address as an `unsafe.Pointer`.
    pub fn unsafe_pointer(addr: usize) -> Self {
        Self::from_raw(Type::scalar(Kind::UnsafePointer), ValueData::UnsafePointer(addr))
    }

    /// Address as a `uintptr` integer.
    pub fn uintptr(addr: usize) -> Self {
        Self::from_raw(Type::scalar(Kind::Uintptr), ValueData::Uint(addr as u64))
    }

    /// Allocate `pointee` and return a pointer to it.
    pub fn new_pointer(pointee: Value) -> Self {
        let ty = Type::pointer_to(pointee.ty());
        Self::from_raw(ty, ValueData::Reference(Some(Arc::new(RwLock::new(pointee)))))
    }

    /// Array value of the given element type.
    pub fn array(elem: &Type, elems: Vec<Value>) -> Result<Self, ValueError> {
        if let Some(bad) = elems.iter().find(|v| v.kind() != elem.kind()) {
            return Err(ValueError::mismatch(elem.name(), bad));
        }
        let ty = Type::array_of(elem, elems.len());
        Ok(Self::from_raw(ty, ValueData::Array(elems)))
    }

    /// Struct value built from all of its fields, in declaration order.
    ///
    /// Field values are retyped to the declared field types.
    pub fn from_fields(ty: &Type, fields: Vec<Value>) -> Result<Self, ValueError> {
        let decls = ty
            .descriptor()
            .fields()
            .ok_or_else(|| ValueError::TypeMismatch {
                expected: "struct".to_string(),
                got: ty.name().to_string(),
            })?;
        if decls.len() != fields.len() {
            return Err(ValueError::ArityMismatch {
                expected: decls.len(),
                got: fields.len(),
            });
        }

        let fields = decls
            .iter()
            .zip(fields)
            .map(|(decl, value)| value.convert(&decl.ty))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_raw(ty.clone(), ValueData::Struct(fields)))
    }

    /// Retype the value to `ty`, which must have the same kind.
    pub fn convert(mut self, ty: &Type) -> Result<Self, ValueError> {
        if self.kind() != ty.kind() {
            return Err(ValueError::mismatch(ty.name(), &self));
        }
        self.ty = ty.clone();
        Ok(self)
    }

    /// Get the type.
    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Get the kind.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    /// Whether the value may be read with [`get`](Self::get) and called.
    /// False for values reached through an unexported field.
    #[inline]
    pub fn can_interface(&self) -> bool {
        !self.read_only
    }

    /// Whether a func or reference value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(
            self.data,
            ValueData::Func(None) | ValueData::Reference(None)
        )
    }

    /// Number of struct fields.
    pub fn num_field(&self) -> usize {
        match &self.data {
            ValueData::Struct(fields) => fields.len(),
            _ => 0,
        }
    }

    /// Struct field by index.
    pub fn field(&self, index: usize) -> Result<Value, ValueError> {
        let ValueData::Struct(fields) = &self.data else {
            return Err(ValueError::mismatch("struct", self));
        };
        let count = fields.len();
        let (value, decl) = fields
            .get(index)
            .zip(self.ty.field(index))
            .ok_or(ValueError::FieldIndexOutOfRange { index, count })?;

        let mut value = value.clone();
        value.read_only = self.read_only || !decl.exported;
        Ok(value)
    }

    /// Struct field by name.
    pub fn field_by_name(&self, name: &str) -> Result<Value, ValueError> {
        let decl = self
            .ty
            .field_by_name(name)
            .ok_or_else(|| ValueError::FieldNotFound(name.to_string()))?;
        self.field(decl.index)
    }

    /// Array element by index.
    pub fn index(&self, index: usize) -> Option<Value> {
        match &self.data {
            ValueData::Array(elems) => elems.get(index).map(|v| {
                let mut v = v.clone();
                v.read_only = self.read_only;
                v
            }),
            _ => None,
        }
    }

    /// Target of a pointer or interface value (None if nil).
    pub fn elem(&self) -> Option<Value> {
        match &self.data {
            ValueData::Reference(Some(target)) => {
                let mut v = target.read().clone();
                v.read_only = self.read_only;
                Some(v)
            }
            _ => None,
        }
    }

    /// Store through a pointer. Every value sharing the pointer observes it.
    pub fn set_elem(&self, value: Value) -> Result<(), ValueError> {
        if self.read_only {
            return Err(ValueError::Unexported {
                ty: self.ty.name().to_string(),
            });
        }
        let ValueData::Reference(Some(target)) = &self.data else {
            return Err(ValueError::mismatch("non-nil pointer", self));
        };
        let mut slot = target.write();
        if slot.kind() != value.kind() {
            return Err(ValueError::mismatch(slot.ty().name(), &value));
        }
        let ty = slot.ty.clone();
        *slot = value.convert(&ty)?;
        Ok(())
    }

    /// Raw bool contents.
    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            ValueData::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Raw signed integer contents, widened to `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            ValueData::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Raw unsigned integer contents, widened to `u64`.
    pub fn as_uint(&self) -> Option<u64> {
        match self.data {
            ValueData::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Raw float contents, widened to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self.data {
            ValueData::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Raw complex contents, widened to `Complex128`.
    pub fn as_complex(&self) -> Option<Complex128> {
        match self.data {
            ValueData::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// Raw string contents.
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::String(v) => Some(v),
            _ => None,
        }
    }

    /// Address held by a func, unsafe pointer or reference value (0 if nil).
    ///
    /// For a func this is its code address. All bound method values report
    /// the same address, that of the shared method-value dispatch stub.
    pub fn pointer(&self) -> Option<usize> {
        match &self.data {
            ValueData::Func(f) => Some(f.as_ref().map_or(0, FuncRepr::code)),
            ValueData::UnsafePointer(addr) => Some(*addr),
            ValueData::Reference(r) => Some(r.as_ref().map_or(0, |r| Arc::as_ptr(r) as usize)),
            _ => None,
        }
    }

    /// Typed read. Refused for values reached through an unexported field.
    pub fn get<T: FromValue>(&self) -> Result<T, ValueError> {
        if self.read_only {
            return Err(ValueError::Unexported {
                ty: self.ty.name().to_string(),
            });
        }
        T::from_value(self)
    }

    /// Method value bound to this receiver.
    pub fn method_by_name(&self, name: &str) -> Option<Value> {
        let method = self.ty.method_by_name(name)?;
        let mut receiver = self.clone();
        receiver.read_only = false;
        Some(Self {
            ty: Type::scalar(Kind::Func),
            data: ValueData::Func(Some(FuncRepr::Method {
                receiver: Box::new(receiver),
                method: method.func,
            })),
            read_only: self.read_only,
        })
    }

    /// Call a func value.
    pub fn call(&self, args: &[Value]) -> Result<Vec<Value>, ValueError> {
        if self.read_only {
            return Err(ValueError::Unexported {
                ty: self.ty.name().to_string(),
            });
        }
        match &self.data {
            ValueData::Func(Some(FuncRepr::Native(f))) => Ok(f(args)),
            ValueData::Func(Some(FuncRepr::Method { receiver, method })) => {
                Ok(METHOD_VALUE_CALL(receiver, *method, args))
            }
            ValueData::Func(None) => Err(ValueError::NilFunc),
            _ => Err(ValueError::NotCallable(self.ty.name().to_string())),
        }
    }
}

impl PartialEq for Value {
    /// Content equality: same kind and same contents. References and funcs
    /// compare by address.
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.data == other.data
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("type", &self.ty.name());
        match &self.data {
            ValueData::Bool(v) => s.field("data", v),
            ValueData::Int(v) => s.field("data", v),
            ValueData::Uint(v) => s.field("data", v),
            ValueData::Float(v) => s.field("data", v),
            ValueData::Complex(v) => s.field("data", v),
            ValueData::String(v) => s.field("data", v),
            ValueData::Array(v) | ValueData::Struct(v) => s.field("data", v),
            ValueData::Func(_) | ValueData::UnsafePointer(_) | ValueData::Reference(_) => {
                s.field("data", &format_args!("{:#x}", self.pointer().unwrap_or(0)))
            }
        };
        s.field("read_only", &self.read_only).finish()
    }
}

// Conversion traits
macro_rules! impl_into_value {
    ($ty:ty, $kind:ident, $variant:ident, $raw:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::from_raw(Type::scalar(Kind::$kind), ValueData::$variant(v as $raw))
            }
        }
    };
}

impl_into_value!(isize, Int, Int, i64);
impl_into_value!(i8, Int8, Int, i64);
impl_into_value!(i16, Int16, Int, i64);
impl_into_value!(i32, Int32, Int, i64);
impl_into_value!(i64, Int64, Int, i64);
impl_into_value!(usize, Uint, Uint, u64);
impl_into_value!(u8, Uint8, Uint, u64);
impl_into_value!(u16, Uint16, Uint, u64);
impl_into_value!(u32, Uint32, Uint, u64);
impl_into_value!(u64, Uint64, Uint, u64);
impl_into_value!(f32, Float32, Float, f64);
impl_into_value!(f64, Float64, Float, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::from_raw(Type::scalar(Kind::Bool), ValueData::Bool(v))
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Self::from_raw(Type::scalar(Kind::Complex64), ValueData::Complex(v.into()))
    }
}

impl From<Complex128> for Value {
    fn from(v: Complex128) -> Self {
        Self::from_raw(Type::scalar(Kind::Complex128), ValueData::Complex(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::from_raw(Type::scalar(Kind::String), ValueData::String(Arc::from(v)))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::from_raw(Type::scalar(Kind::String), ValueData::String(Arc::from(v)))
    }
}

/// Trait for typed reads out of a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ValueError> {
                match (value.kind(), &value.data) {
                    (Kind::$kind, ValueData::$variant(v)) => Ok(*v as $ty),
                    _ => Err(ValueError::mismatch(Kind::$kind.name(), value)),
                }
            }
        }
    };
}

impl_from_value!(isize, Int, Int);
impl_from_value!(i8, Int8, Int);
impl_from_value!(i16, Int16, Int);
impl_from_value!(i32, Int32, Int);
impl_from_value!(i64, Int64, Int);
impl_from_value!(u8, Uint8, Uint);
impl_from_value!(u16, Uint16, Uint);
impl_from_value!(u32, Uint32, Uint);
impl_from_value!(u64, Uint64, Uint);
impl_from_value!(f32, Float32, Float);
impl_from_value!(f64, Float64, Float);

impl FromValue for usize {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match (value.kind(), &value.data) {
            (Kind::Uint | Kind::Uintptr, ValueData::Uint(v)) => Ok(*v as usize),
            (Kind::UnsafePointer, ValueData::UnsafePointer(v)) => Ok(*v),
            _ => Err(ValueError::mismatch("uint", value)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value
            .as_bool()
            .ok_or_else(|| ValueError::mismatch("bool", value))
    }
}

impl FromValue for Complex64 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match (value.kind(), &value.data) {
            (Kind::Complex64, ValueData::Complex(c)) => {
                Ok(Complex64::new(c.re as f32, c.im as f32))
            }
            _ => Err(ValueError::mismatch("complex64", value)),
        }
    }
}

impl FromValue for Complex128 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match (value.kind(), &value.data) {
            (Kind::Complex128, ValueData::Complex(c)) => Ok(*c),
            _ => Err(ValueError::mismatch("complex128", value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ValueError::mismatch("string", value))
    }
}
