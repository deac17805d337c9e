// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property descriptors.

use super::Model;
use crate::error::Result;
use crate::observe::Signal;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Reads a property from its owner instance.
pub type Getter = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Writes a property, returning the owner instance (a new one for records).
pub type Setter = Arc<dyn Fn(&Value, Value) -> Result<Value> + Send + Sync>;

/// Produces the change signal of a property.
pub type Observer = Arc<dyn Fn(&Value) -> Result<Signal> + Send + Sync>;

/// One named, typed slot of a model.
#[derive(Clone)]
pub struct Property {
    model: Arc<Model>,
    name: Arc<str>,
    transient: bool,
    getter: Getter,
    setter: Setter,
    observer: Option<Observer>,
}

impl Property {
    pub fn new(model: Arc<Model>, name: impl Into<Arc<str>>, getter: Getter, setter: Setter) -> Self {
        Self {
            model,
            name: name.into(),
            transient: false,
            getter,
            setter,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    /// Model of the property's value type.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage is excluded from persistence.
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn is_observable(&self) -> bool {
        self.observer.is_some()
    }

    pub(crate) fn read(&self, instance: &Value) -> Result<Value> {
        (self.getter)(instance)
    }

    pub(crate) fn write(&self, instance: &Value, value: Value) -> Result<Value> {
        (self.setter)(instance, value)
    }

    pub(crate) fn observe(&self, instance: &Value) -> Result<Signal> {
        match &self.observer {
            Some(observer) => observer(instance),
            None => Ok(Signal::never()),
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.model, &other.model)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("model", &self.model.ty())
            .field("transient", &self.transient)
            .field("observable", &self.is_observable())
            .finish()
    }
}
