// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-clone - Clone-ability analysis for runtime-described types
//!
//! Decides, once per struct type, which fields a deep-copy walker must
//! recurse into and which it can copy by plain assignment, and reads scalar
//! values out of unexported fields so they can be copied at all.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_clone::reflect::{Kind, StructBuilder, Type};
//! use hdds_clone::Classifier;
//!
//! let meta = StructBuilder::new("Meta")
//!     .private_field("cache", Type::pointer_to(&Type::scalar(Kind::Int)))
//!     .build();
//! let record = StructBuilder::new("Record")
//!     .private_field("id", Type::scalar(Kind::Int))
//!     .private_field("name", Type::scalar(Kind::String))
//!     .private_field("tags", Type::array_of(&Type::scalar(Kind::Uint8), 0))
//!     .private_field("meta", meta)
//!     .build();
//!
//! let classifier = Classifier::new();
//! let st = classifier.classify(&record).unwrap();
//!
//! // Only `meta` can reach shared state.
//! assert_eq!(st.len(), 1);
//! assert_eq!(st.pointer_fields()[0].index, 3);
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Classifier`] | Per-type cache of struct classifications, shared between threads |
//! | [`StructType`] | Fields of one struct type that need a deep copy |
//! | [`ClassifierConfig`] | Types registered opaque when a classifier is created |
//! | [`copy_scalar_value`] | Readable copy of a scalar read from an unexported field |
//!
//! ## Modules Overview
//!
//! - [`reflect`] - Runtime type and value model (kinds, types, struct builder, values)
//! - [`classify`] - Struct classification and its cache
//! - [`config`] - Classifier configuration
//! - [`extract`] - Unexported-field value extraction

/// Struct classification and its cache.
pub mod classify;
/// Classifier configuration (opaque types).
pub mod config;
/// Readable copies of values held in unexported fields.
pub mod extract;
/// Runtime type and value model.
pub mod reflect;

pub use classify::{Classifier, ClassifyError, StructField, StructType};
pub use config::ClassifierConfig;
pub use extract::copy_scalar_value;
