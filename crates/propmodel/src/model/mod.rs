// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property models: the structural view of a declared type.
//!
//! A [`Model`] describes the properties of instances of one type. Object and
//! generic models scan the class table once and freeze an ordered property
//! list; list, array and map models synthesize a property per index or key on
//! demand; scalar models are leaves.
//!
//! # Example
//!
//! ```rust
//! use propmodel::{builtin, ClassBuilder, ModelRegistry, Type, Value};
//!
//! let registry = ModelRegistry::new();
//! registry
//!     .classes()
//!     .declare(
//!         ClassBuilder::new("Pair")
//!             .accessor("name", Type::class(builtin::STRING))
//!             .accessor("age", Type::class(builtin::I32)),
//!     )
//!     .unwrap();
//!
//! let model = registry.of("Pair").unwrap();
//! let names: Vec<&str> = model.properties().unwrap().iter().map(|p| p.name()).collect();
//! assert_eq!(names, ["age", "name"]);
//!
//! let pair = registry.classes().instantiate(&"Pair".into()).unwrap();
//! let pair = model.set_named(pair, "age", Value::I32(7)).unwrap();
//! assert_eq!(model.get_named(&pair, "age").unwrap(), Value::I32(7));
//! ```

mod container;
mod property;
mod registry;
mod scan;

#[cfg(test)]
mod tests;

pub use property::{Getter, Observer, Property, Setter};
pub use registry::ModelRegistry;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::observe::Signal;
use crate::resolve::TypeResolver;
use crate::types::{builtin, Class, ClassId, ClassKind, Type};
use crate::value::Value;
use parking_lot::ReentrantMutex;
use registry::{ModelKey, Shared};
use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Atomic value with a codec; no properties.
    Scalar,
    /// Composite described by accessor pairs and fields.
    Object,
    /// Indexed sequence, one property per index.
    List,
    /// Key/value map, one property per key.
    Map,
    /// Fixed array, indexed like a list.
    Array,
    /// Parameterized non-container type.
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitState {
    Uninitialized,
    Initializing,
    Initialized,
}

#[derive(Default)]
struct Contents {
    properties: Vec<Property>,
    parameters: Vec<Arc<Model>>,
}

/// Placeholder observed by reentrant lookups while a model initializes.
static EMPTY: Contents = Contents {
    properties: Vec::new(),
    parameters: Vec::new(),
};

/// Structural description of one type.
pub struct Model {
    key: ModelKey,
    ty: Type,
    class: Arc<Class>,
    kind: ModelKind,
    codec: Option<Arc<dyn Codec>>,
    registry: Weak<Shared>,
    state: ReentrantMutex<Cell<InitState>>,
    contents: OnceLock<Contents>,
}

impl Model {
    fn new(
        key: ModelKey,
        ty: Type,
        class: Arc<Class>,
        kind: ModelKind,
        codec: Option<Arc<dyn Codec>>,
        registry: Weak<Shared>,
    ) -> Self {
        Self {
            key,
            ty,
            class,
            kind,
            codec,
            registry,
            state: ReentrantMutex::new(Cell::new(InitState::Uninitialized)),
            contents: OnceLock::new(),
        }
    }

    /// Model of `id` in the [global registry](ModelRegistry::global).
    pub fn of(id: impl Into<ClassId>) -> Result<Arc<Model>> {
        ModelRegistry::global().of(id)
    }

    /// Model of `ty` in the [global registry](ModelRegistry::global).
    pub fn of_type(ty: &Type) -> Result<Arc<Model>> {
        ModelRegistry::global().of_type(ty)
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Concrete type described by this model.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn raw_type(&self) -> &ClassId {
        &self.key.raw
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Simple name of the raw class.
    pub fn display_name(&self) -> &str {
        self.class.simple_name()
    }

    /// Scalars and arrays are atomic.
    pub fn is_atomic(&self) -> bool {
        self.codec.is_some() || self.class.is_array()
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ModelKind::List | ModelKind::Map | ModelKind::Array)
    }

    /// Whether a property of this model may hold null.
    pub fn is_nullable(&self) -> bool {
        self.class.is_nullable()
    }

    pub fn codec(&self) -> Option<&Arc<dyn Codec>> {
        self.codec.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.contents.get().is_some()
    }

    /// Populate the model. Idempotent; concurrent callers wait for the first.
    pub fn init(&self) -> Result<()> {
        self.contents().map(|_| ())
    }

    fn contents(&self) -> Result<&Contents> {
        if let Some(contents) = self.contents.get() {
            return Ok(contents);
        }
        let state = self.state.lock();
        if let Some(contents) = self.contents.get() {
            return Ok(contents);
        }
        if state.get() == InitState::Initializing {
            return Ok(&EMPTY);
        }
        state.set(InitState::Initializing);
        match self.build() {
            Ok(built) => {
                state.set(InitState::Initialized);
                Ok(self.contents.get_or_init(|| built))
            }
            Err(err) => {
                state.set(InitState::Uninitialized);
                log::error!("[model] failed to initialize {}: {}", self.ty, err);
                Err(err)
            }
        }
    }

    fn build(&self) -> Result<Contents> {
        let shared = self.shared()?;
        let resolver = TypeResolver::new(&shared.classes);
        let contents = match self.kind {
            ModelKind::Scalar => Contents::default(),
            ModelKind::Object => Contents {
                properties: scan::PropertyBuilder::new(&shared, &self.class, &self.ty).build()?,
                parameters: Vec::new(),
            },
            ModelKind::Generic => {
                let parameters = match &self.ty {
                    Type::Parameterized { args, .. } => args
                        .iter()
                        .map(|arg| shared.model_for(arg))
                        .collect::<Result<Vec<_>>>()?,
                    _ => Vec::new(),
                };
                Contents {
                    properties: scan::PropertyBuilder::new(&shared, &self.class, &self.ty)
                        .build()?,
                    parameters,
                }
            }
            ModelKind::List => {
                let item = self.argument(&resolver, builtin::LIST, 0)?;
                Contents {
                    properties: Vec::new(),
                    parameters: vec![shared.model_for(&item)?],
                }
            }
            ModelKind::Map => {
                let key = self.argument(&resolver, builtin::MAP, 0)?;
                let value = self.argument(&resolver, builtin::MAP, 1)?;
                Contents {
                    properties: Vec::new(),
                    parameters: vec![shared.model_for(&key)?, shared.model_for(&value)?],
                }
            }
            ModelKind::Array => {
                let component = match &self.class.kind {
                    ClassKind::Array { component } => resolver.resolve(component, &self.ty)?,
                    _ => Type::class(builtin::OBJECT),
                };
                Contents {
                    properties: Vec::new(),
                    parameters: vec![shared.model_for(&component)?],
                }
            }
        };
        if shared.config().log_scans {
            log::debug!(
                "[model] initialized {} as {:?} ({} properties, {} parameters)",
                self.ty,
                self.kind,
                contents.properties.len(),
                contents.parameters.len()
            );
        }
        Ok(contents)
    }

    /// Type argument `index` this model's type supplies to `target`, `Object`
    /// when the raw container is used without arguments.
    fn argument(&self, resolver: &TypeResolver<'_>, target: &str, index: usize) -> Result<Type> {
        let params = resolver.collect_parameters(&self.ty, &ClassId::new(target))?;
        match params.get(index) {
            Some(arg) => resolver.resolve(arg, &self.ty),
            None => Ok(Type::class(builtin::OBJECT)),
        }
    }

    fn shared(&self) -> Result<Arc<Shared>> {
        self.registry.upgrade().ok_or(Error::RegistryDropped)
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Resolved type-parameter models: item for lists and arrays, key and
    /// value for maps, arguments for generics.
    pub fn parameters(&self) -> Result<&[Arc<Model>]> {
        Ok(&self.contents()?.parameters)
    }

    /// Ordered, frozen property list. Empty for scalars and containers.
    pub fn properties(&self) -> Result<&[Property]> {
        Ok(&self.contents()?.properties)
    }

    /// Property named `name`, synthesized for containers.
    pub fn property(&self, name: &str) -> Result<Option<Property>> {
        match self.kind {
            ModelKind::Scalar => Ok(None),
            ModelKind::Object | ModelKind::Generic => Ok(self
                .properties()?
                .iter()
                .find(|p| p.name() == name)
                .cloned()),
            ModelKind::List | ModelKind::Array => {
                let Some(index) = container::parse_index(name) else {
                    return Ok(None);
                };
                let Some(item) = self.parameters()?.first() else {
                    return Ok(None);
                };
                let limit = self.shared()?.config().max_sequence_growth;
                Ok(Some(container::index_property(item, index, limit)))
            }
            ModelKind::Map => {
                let [key_model, value_model] = self.parameters()? else {
                    return Ok(None);
                };
                let Some(codec) = key_model.codec() else {
                    return Ok(None);
                };
                match codec.decode(name) {
                    Ok(key) => {
                        let name = codec.encode(&key).unwrap_or_else(|_| name.to_string());
                        Ok(Some(container::key_property(value_model, &name, key)))
                    }
                    Err(err) => {
                        log::trace!("[model] {}: no key for {:?}: {}", self.ty, name, err);
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Read `property` from `instance`. Null instance or absent property → null.
    pub fn get(&self, instance: &Value, property: Option<&Property>) -> Result<Value> {
        match property {
            Some(property) if !instance.is_null() => property.read(instance),
            _ => Ok(Value::Null),
        }
    }

    pub fn get_named(&self, instance: &Value, name: &str) -> Result<Value> {
        let property = self.property(name)?;
        self.get(instance, property.as_ref())
    }

    /// Write `value` to `property` of `instance`, returning the instance
    /// (a new one for records).
    pub fn set(&self, instance: Value, property: Option<&Property>, value: Value) -> Result<Value> {
        let Some(property) = property else {
            return Ok(instance);
        };
        if instance.is_null() || (value.is_null() && !property.model().is_nullable()) {
            return Ok(instance);
        }
        if !property.model().accepts(&value) {
            return Err(Error::mismatch(property.model().ty(), value.type_name()));
        }
        property.write(&instance, value)
    }

    pub fn set_named(&self, instance: Value, name: &str, value: Value) -> Result<Value> {
        let property = self.property(name)?;
        self.set(instance, property.as_ref(), value)
    }

    /// Change signal of `property`, or [`Signal::never`] when unobservable.
    pub fn observe(&self, instance: &Value, property: Option<&Property>) -> Result<Signal> {
        match property {
            Some(property) if !instance.is_null() => property.observe(instance),
            _ => Ok(Signal::never()),
        }
    }

    /// Visit every property of `instance` with its current value, in list
    /// order; containers visit every element or entry.
    pub fn walk<F>(&self, instance: &Value, mut visitor: F) -> Result<()>
    where
        F: FnMut(&Model, &Property, &Value),
    {
        if instance.is_null() {
            return Ok(());
        }
        match self.kind {
            ModelKind::Scalar => {}
            ModelKind::Object | ModelKind::Generic => {
                for property in self.properties()? {
                    let value = property.read(instance)?;
                    visitor(self, property, &value);
                }
            }
            ModelKind::List | ModelKind::Array => {
                let Some(item) = self.parameters()?.first() else {
                    return Ok(());
                };
                let limit = self.shared()?.config().max_sequence_growth;
                for (index, value) in instance.as_sequence()?.to_vec().iter().enumerate() {
                    let property = container::index_property(item, index, limit);
                    visitor(self, &property, value);
                }
            }
            ModelKind::Map => {
                let [key_model, value_model] = self.parameters()? else {
                    return Ok(());
                };
                let Some(codec) = key_model.codec() else {
                    return Ok(());
                };
                let mut entries = Vec::new();
                for (key, value) in instance.as_map()?.entries() {
                    entries.push((codec.encode(&key)?, key, value));
                }
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                for (name, key, value) in entries {
                    let property = container::key_property(value_model, &name, key);
                    visitor(self, &property, &value);
                }
            }
        }
        Ok(())
    }

    /// Whether `value` may be stored in a property of this model.
    ///
    /// Null is always accepted here; primitives accept only their own kind.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        if let Some(kind) = self.class.primitive_kind() {
            return value.primitive_kind() == Some(kind);
        }
        let (Some(runtime), Ok(shared)) = (value.runtime_class(), self.shared()) else {
            return false;
        };
        shared.classes.is_assignable_from(self.raw_type(), &runtime)
    }

    /// Text form of `value` through this model's codec.
    pub fn encode(&self, value: &Value) -> Result<String> {
        match &self.codec {
            Some(codec) => codec.encode(value),
            None => Err(Error::mismatch("atomic type", self.ty())),
        }
    }

    /// Parse `text` through this model's codec.
    pub fn decode(&self, text: &str) -> Result<Value> {
        match &self.codec {
            Some(codec) => codec.decode(text),
            None => Err(Error::Codec {
                type_name: self.ty.to_string(),
                input: text.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("atomic", &self.is_atomic())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}
