// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # propmodel - Introspective property models
//!
//! Describes the structure of declared types as trees of named, typed
//! properties: scalar leaves, composite objects and parameterized containers
//! (lists, maps, arrays, user generics). Serialization layers, code generators
//! and expression evaluators use the models to read, write and observe
//! instance state without knowing the concrete types.
//!
//! ## Quick Start
//!
//! ```rust
//! use propmodel::{builtin, ClassBuilder, ModelRegistry, Result, Type, Value};
//!
//! fn main() -> Result<()> {
//!     let registry = ModelRegistry::new();
//!     let classes = registry.classes();
//!     classes.declare(
//!         ClassBuilder::new("Base")
//!             .type_param("T")
//!             .field("value", Type::var("Base", "T")),
//!     )?;
//!     classes.declare(
//!         ClassBuilder::new("Counter").extends(Type::parameterized("Base", [Type::class(builtin::INTEGER)])),
//!     )?;
//!
//!     let model = registry.of("Counter")?;
//!     let value = model.property("value")?.expect("declared field");
//!     assert_eq!(value.model().raw_type().as_str(), builtin::INTEGER);
//!
//!     let counter = classes.instantiate(&"Counter".into())?;
//!     let counter = model.set(counter, Some(&value), Value::I32(3))?;
//!     assert_eq!(model.get(&counter, Some(&value))?, Value::I32(3));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ClassTable -> TypeResolver -> ModelRegistry -> Model -> Property
//!  (declared     (generic        (cache, one      (scan    (get / set /
//!   classes)      binding)        per type)        once)    observe / walk)
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - Declared classes, type expressions and the class table
//! - [`model`] - Models, properties and the registry (start here)
//! - [`resolve`] - Generic type resolution
//! - [`codec`] - Text codecs of atomic types
//! - [`observe`] - Observable holders and change signals
//! - [`value`] - Dynamic values and shared instance references
//! - [`config`] - Registry configuration

// Allow the derive macro to work inside this crate's tests
extern crate self as propmodel;

pub mod codec;
pub mod config;
mod error;
pub mod model;
pub mod observe;
pub mod resolve;
pub mod types;
pub mod value;

pub use codec::{Codec, CodecRegistry, FnCodec};
pub use config::ModelConfig;
pub use error::{Error, Result};
pub use model::{Model, ModelKind, ModelRegistry, Property};
pub use observe::{Signal, Variable};
pub use resolve::TypeResolver;
pub use types::{
    builtin, Class, ClassBuilder, ClassId, ClassKind, ClassTable, Constructor, Field, Method,
    Modifiers, PrimitiveKind, Type, TypeParam, TypeVariable,
};
pub use value::{FromValue, MapValue, Object, ObjectRef, Sequence, Value};

// Re-export the declaration trait and its derive macro
pub use propmodel_codegen::Declare; // Derive macro (for #[derive(propmodel::Declare)])
pub use types::Declare; // Trait (for type bounds)

/// propmodel version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
