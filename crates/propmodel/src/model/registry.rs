// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model cache.
//!
//! Models are inserted into the cache before their contents are built, so
//! self-referential and mutually recursive types resolve to the cached
//! instance instead of recursing. Entries are never removed.

use super::{Model, ModelKind};
use crate::codec::CodecRegistry;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::resolve::TypeResolver;
use crate::types::{builtin, ClassId, ClassTable, Type};
use crate::value::Value;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Cache key: raw class plus resolved type arguments (empty for scalar and
/// object models).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ModelKey {
    pub(crate) raw: ClassId,
    pub(crate) args: Vec<Type>,
}

pub(crate) struct Shared {
    pub(crate) classes: ClassTable,
    pub(crate) codecs: CodecRegistry,
    models: DashMap<ModelKey, Arc<Model>>,
    config: ArcSwap<ModelConfig>,
}

impl Shared {
    pub(crate) fn config(&self) -> Arc<ModelConfig> {
        self.config.load_full()
    }

    /// Cached (possibly uninitialized) model of a resolved type.
    pub(crate) fn model_for(self: &Arc<Self>, concrete: &Type) -> Result<Arc<Model>> {
        let (raw, args) = match concrete {
            Type::Class(id) => (id, &[][..]),
            Type::Parameterized { raw, args } => (raw, &args[..]),
            other => {
                return Err(Error::Internal(format!(
                    "model requested for unresolved type {}",
                    other
                )))
            }
        };
        let class = self.classes.get(raw)?;

        if class.synthetic {
            if let Some(superclass) = &class.superclass {
                let resolved = TypeResolver::new(&self.classes).resolve(superclass, concrete)?;
                return self.model_for(&resolved);
            }
        }

        let codec = self.codecs.find(&class);
        let kind = if self.classes.is_assignable_from(&ClassId::new(builtin::LIST), raw) {
            ModelKind::List
        } else if self.classes.is_assignable_from(&ClassId::new(builtin::MAP), raw) {
            ModelKind::Map
        } else if class.is_array() {
            ModelKind::Array
        } else if codec.is_some() {
            ModelKind::Scalar
        } else if !args.is_empty() {
            ModelKind::Generic
        } else {
            ModelKind::Object
        };

        let (key, ty) = match kind {
            ModelKind::Scalar | ModelKind::Object | ModelKind::Array => (
                ModelKey {
                    raw: raw.clone(),
                    args: Vec::new(),
                },
                Type::Class(raw.clone()),
            ),
            ModelKind::List | ModelKind::Map | ModelKind::Generic => (
                ModelKey {
                    raw: raw.clone(),
                    args: args.to_vec(),
                },
                concrete.clone(),
            ),
        };

        if let Some(model) = self.models.get(&key) {
            return Ok(Arc::clone(model.value()));
        }
        let model = self
            .models
            .entry(key.clone())
            .or_insert_with(|| {
                log::trace!("[model] created {} ({:?})", ty, kind);
                Arc::new(Model::new(
                    key,
                    ty,
                    class,
                    kind,
                    codec,
                    Arc::downgrade(self),
                ))
            })
            .value()
            .clone();
        Ok(model)
    }
}

/// Registry of models over one class table.
///
/// Cheap to clone; clones share the cache. Use [`ModelRegistry::global`] for
/// the process-wide registry or [`ModelRegistry::new`] for an isolated one.
#[derive(Clone)]
pub struct ModelRegistry {
    shared: Arc<Shared>,
}

static GLOBAL: OnceLock<ModelRegistry> = OnceLock::new();

impl ModelRegistry {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                classes: ClassTable::new(),
                codecs: CodecRegistry::new(),
                models: DashMap::new(),
                config: ArcSwap::from_pointee(config),
            }),
        }
    }

    /// Process-wide registry, configured from the environment on first use.
    pub fn global() -> &'static ModelRegistry {
        GLOBAL.get_or_init(|| {
            let config = ModelConfig::from_env().unwrap_or_else(|err| {
                log::warn!("[model] ignoring environment configuration: {}", err);
                ModelConfig::default()
            });
            Self::with_config(config)
        })
    }

    pub fn classes(&self) -> &ClassTable {
        &self.shared.classes
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.shared.codecs
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.shared.classes)
    }

    pub fn config(&self) -> Arc<ModelConfig> {
        self.shared.config()
    }

    /// Replace the configuration. Already frozen property lists are kept.
    pub fn set_config(&self, config: ModelConfig) {
        self.shared.config.store(Arc::new(config));
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.shared.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.models.is_empty()
    }

    /// Initialized model of class `id`.
    pub fn of(&self, id: impl Into<ClassId>) -> Result<Arc<Model>> {
        self.of_type(&Type::Class(id.into()))
    }

    /// Initialized model of `ty`. Variables and wildcards resolve against `ty`
    /// itself, i.e. to their bounds.
    pub fn of_type(&self, ty: &Type) -> Result<Arc<Model>> {
        let resolved = self.resolver().resolve(ty, ty)?;
        let model = self.shared.model_for(&resolved)?;
        model.init()?;
        Ok(model)
    }

    /// Initialized model of the runtime class of `value`; `None` for null.
    pub fn of_value(&self, value: &Value) -> Result<Option<Arc<Model>>> {
        match value.runtime_class() {
            Some(class) => self.of(class).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("classes", &self.shared.classes.len())
            .field("models", &self.shared.models.len())
            .finish()
    }
}
