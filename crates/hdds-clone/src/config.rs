// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Classifier configuration.
//!
//! # Opaque types
//!
//! A type registered opaque is always copied by plain assignment, even if
//! its fields hold pointers. This trades deep-copy fidelity for speed on
//! types that are immutable in practice. Two types are registered by default:
//!
//! - `time.Time` (shares its zone descriptor, which is never mutated)
//! - `reflect.Value` (a view, copying it must not copy what it views)
//!
//! # Example
//!
//! ```rust
//! use hdds_clone::config::ClassifierConfig;
//! use hdds_clone::reflect::{Kind, StructBuilder, Type};
//! use hdds_clone::Classifier;
//!
//! let handle = StructBuilder::new("Handle")
//!     .private_field("inner", Type::pointer_to(&Type::scalar(Kind::Int)))
//!     .build();
//!
//! let config = ClassifierConfig::default().with_opaque(handle.clone());
//! let classifier = Classifier::with_config(&config);
//!
//! assert!(classifier.classify(&handle).unwrap().is_shallow());
//! ```

use crate::reflect::{builtin, Type};

/// Configuration for a [`Classifier`](crate::Classifier).
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    opaque_types: Vec<Type>,
}

impl ClassifierConfig {
    /// Configuration with no opaque types at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            opaque_types: Vec::new(),
        }
    }

    /// Register an additional opaque type (pointers are unwrapped, non-struct
    /// types are ignored when the classifier is built).
    #[must_use]
    pub fn with_opaque(mut self, ty: Type) -> Self {
        if !self.opaque_types.contains(&ty) {
            self.opaque_types.push(ty);
        }
        self
    }

    /// Drop the built-in opaque types, keeping any added with [`with_opaque`](Self::with_opaque).
    #[must_use]
    pub fn without_builtins(mut self) -> Self {
        let builtins = [builtin::time_type(), builtin::value_type()];
        self.opaque_types.retain(|ty| !builtins.contains(ty));
        self
    }

    /// Types registered opaque when the classifier is created.
    pub fn opaque_types(&self) -> &[Type] {
        &self.opaque_types
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::empty()
            .with_opaque(builtin::time_type())
            .with_opaque(builtin::value_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Kind, StructBuilder};

    #[test]
    fn test_default_registers_builtins() {
        let config = ClassifierConfig::default();
        assert_eq!(config.opaque_types().len(), 2);
        assert!(config.opaque_types().contains(&builtin::time_type()));
        assert!(config.opaque_types().contains(&builtin::value_type()));
    }

    #[test]
    fn test_with_opaque_deduplicates() {
        let ty = StructBuilder::new("T").scalar_field("a", Kind::Int).build();
        let config = ClassifierConfig::empty()
            .with_opaque(ty.clone())
            .with_opaque(ty);
        assert_eq!(config.opaque_types().len(), 1);
    }

    #[test]
    fn test_without_builtins_keeps_custom() {
        let ty = StructBuilder::new("T").scalar_field("a", Kind::Int).build();
        let config = ClassifierConfig::default()
            .with_opaque(ty.clone())
            .without_builtins();
        assert_eq!(config.opaque_types(), &[ty]);
    }
}
