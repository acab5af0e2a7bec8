// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Clone-ability classification of struct types.
//!
//! For each struct type, the [`Classifier`] computes once which fields may
//! transitively hold shared mutable state (pointers, slices, maps, chans,
//! interfaces) and therefore need a deep copy. Every other field can be
//! copied by plain assignment. A struct with no such field is *shallow*: the
//! whole value can be copied by assignment.
//!
//! # Rules (per field, in declaration order)
//!
//! | Field type | Deep copy? |
//! |------------|------------|
//! | opaque kind (bool, numbers, string, func, unsafe pointer) | no |
//! | `[0]T` | no |
//! | `[N]T`, T opaque | no |
//! | `[N]T`, T struct | iff T is not shallow |
//! | `[N]T`, any other T | yes |
//! | struct | iff it is not shallow |
//! | pointer, slice, map, chan, interface | yes |
//!
//! Recursion only follows struct and array fields, which are stored inline,
//! so it always terminates: a struct can only reach itself through a pointer.
//!
//! # Concurrency
//!
//! Results are computed without holding any lock and stored with
//! first-writer-wins. Threads racing on the same unseen type may compute it
//! twice and the first stored result is kept. The two results can differ
//! only if a nested type was marked opaque between the computations.

use crate::config::ClassifierConfig;
use crate::reflect::{Kind, Type, TypeKind};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// A field that needs a deep copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Byte offset from the start of the struct.
    pub offset: usize,
    /// Position among the struct's fields.
    pub index: usize,
}

/// Classification of one struct type.
///
/// Cheap to clone: the field list is shared. A shallow struct holds no
/// allocation at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    pointer_fields: Option<Arc<[StructField]>>,
}

impl StructType {
    fn from_fields(fields: Vec<StructField>) -> Self {
        if fields.is_empty() {
            return Self::default();
        }
        Self {
            pointer_fields: Some(fields.into()),
        }
    }

    /// Fields that need a deep copy, in declaration order.
    #[inline]
    pub fn pointer_fields(&self) -> &[StructField] {
        self.pointer_fields.as_deref().unwrap_or(&[])
    }

    /// Whether the whole struct can be copied by assignment.
    #[inline]
    pub fn is_shallow(&self) -> bool {
        self.pointer_fields.is_none()
    }

    /// Number of fields that need a deep copy.
    #[inline]
    pub fn len(&self) -> usize {
        self.pointer_fields().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_shallow()
    }

    /// Iterate over the fields that need a deep copy.
    pub fn iter(&self) -> std::slice::Iter<'_, StructField> {
        self.pointer_fields().iter()
    }
}

impl<'a> IntoIterator for &'a StructType {
    type Item = &'a StructField;
    type IntoIter = std::slice::Iter<'a, StructField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors for classification requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Only struct types (or pointers to them) have fields to classify.
    NotAStruct { ty: String, kind: Kind },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAStruct { ty, kind } => {
                write!(f, "Cannot classify {} type {}: not a struct", kind, ty)
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Per-type cache of struct classifications.
///
/// Clones share the same cache. Entries are never evicted: the cache grows
/// with the number of distinct struct types seen, not with the data copied.
#[derive(Debug, Clone)]
pub struct Classifier {
    cache: Arc<DashMap<Type, StructType>>,
}

impl Classifier {
    /// Create a classifier with the default opaque types registered.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ClassifierConfig::default())
    }

    /// Create a classifier with the opaque types of `config` registered.
    #[must_use]
    pub fn with_config(config: &ClassifierConfig) -> Self {
        let classifier = Self {
            cache: Arc::new(DashMap::new()),
        };
        for ty in config.opaque_types() {
            classifier.mark_opaque(ty);
        }
        classifier
    }

    /// Register `ty` as opaque: it is copied by assignment, whatever its
    /// fields hold.
    ///
    /// Pointer types are unwrapped first. Non-struct types are ignored.
    /// Replaces any classification already stored for the type.
    pub fn mark_opaque(&self, ty: &Type) {
        let ty = ty.unpointer();
        if ty.kind() != Kind::Struct {
            log::debug!(
                "[classify] mark_opaque ignores non-struct type {} ({})",
                ty,
                ty.kind()
            );
            return;
        }

        log::trace!("[classify] {} marked opaque", ty);
        self.cache.insert(ty, StructType::default());
    }

    /// Classify a struct type (pointer types are unwrapped first).
    ///
    /// Returns the cached result if there is one, otherwise computes it,
    /// recursing into nested struct and array fields.
    pub fn classify(&self, ty: &Type) -> Result<StructType, ClassifyError> {
        let ty = ty.unpointer();
        if ty.kind() != Kind::Struct {
            return Err(ClassifyError::NotAStruct {
                ty: ty.name().to_string(),
                kind: ty.kind(),
            });
        }
        Ok(self.load(&ty))
    }

    /// Whether a whole value of `ty` can be copied by assignment.
    ///
    /// Answers as the field rules do for a field of type `ty`: true for
    /// opaque kinds, shallow structs, zero-length arrays and arrays of opaque
    /// kinds or shallow structs. False for arrays of any other element
    /// (including nested arrays) and for pointer, slice, map, chan and
    /// interface types.
    pub fn is_opaque_type(&self, ty: &Type) -> bool {
        !self.needs_deep_copy(ty)
    }

    /// Whether a classification is stored for `ty` (pointers unwrapped).
    pub fn contains(&self, ty: &Type) -> bool {
        self.cache.contains_key(&ty.unpointer())
    }

    /// Number of stored classifications.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// `ty` must be a struct type.
    fn load(&self, ty: &Type) -> StructType {
        // The read guard must be released before recursing.
        let cached = self.cache.get(ty).map(|st| st.value().clone());
        if let Some(st) = cached {
            return st;
        }

        let computed = self.compute(ty);

        match self.cache.entry(ty.clone()) {
            Entry::Occupied(entry) => {
                // The stored result may differ from ours if this type or a
                // nested one was marked opaque in between. Stored wins.
                let stored = entry.get().clone();
                drop(entry);
                log::debug!("[classify] {} already stored, discarding computed result", ty);
                stored
            }
            Entry::Vacant(entry) => {
                log::trace!(
                    "[classify] {}: {} of {} fields need deep copy",
                    ty,
                    computed.len(),
                    ty.num_field()
                );
                entry.insert(computed.clone());
                computed
            }
        }
    }

    fn compute(&self, ty: &Type) -> StructType {
        let fields = ty.fields();
        let mut pointer_fields = Vec::with_capacity(fields.len());

        for field in fields {
            if self.needs_deep_copy(&field.ty) {
                pointer_fields.push(StructField {
                    offset: field.offset,
                    index: field.index,
                });
            }
        }

        StructType::from_fields(pointer_fields)
    }

    fn needs_deep_copy(&self, ty: &Type) -> bool {
        if ty.kind().is_opaque() {
            return false;
        }

        match &ty.descriptor().kind {
            TypeKind::Array(arr) => {
                if arr.length == 0 {
                    return false;
                }
                let elem = &arr.element_type;
                match elem.kind() {
                    kind if kind.is_opaque() => false,
                    Kind::Struct => !self.load(elem).is_shallow(),
                    _ => true,
                }
            }
            TypeKind::Struct(_) => !self.load(ty).is_shallow(),
            other => other.kind().is_reference(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
