// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime values of declared classes.
//!
//! Scalars are held inline. Objects, sequences, maps and holders are shared
//! references with interior mutability, so writes through one handle are
//! visible through every clone.

mod convert;

pub use convert::FromValue;

use crate::error::{Error, Result};
use crate::observe::Variable;
use crate::types::{builtin, ClassId, PrimitiveKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared object instance.
pub type ObjectRef = Arc<Object>;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Enum { class: ClassId, constant: Arc<str> },

    // References
    Object(ObjectRef),
    List(Arc<Sequence>),
    Array(Arc<Sequence>),
    Map(Arc<MapValue>),
    Variable(Arc<Variable>),

    // Special
    Null,
}

impl Value {
    /// Enum constant value.
    pub fn enumeration(class: ClassId, constant: impl AsRef<str>) -> Self {
        Self::Enum {
            class,
            constant: Arc::from(constant.as_ref()),
        }
    }

    /// New `ArrayList` holding `items`.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(Arc::new(Sequence::new(
            ClassId::new(builtin::ARRAY_LIST),
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// New `HashMap` holding `entries`.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let map = MapValue::new(ClassId::new(builtin::HASH_MAP));
        for (key, value) in entries {
            map.insert(key.into(), value.into());
        }
        Self::Map(Arc::new(map))
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I8(v) => Some(i32::from(*v)),
            Self::I16(v) => Some(i32::from(*v)),
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Enum constant name.
    pub fn as_constant(&self) -> Option<&str> {
        match self {
            Self::Enum { constant, .. } => Some(constant),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Result<&ObjectRef> {
        match self {
            Self::Object(object) => Ok(object),
            other => Err(Error::mismatch("object", other.type_name())),
        }
    }

    pub fn as_list(&self) -> Result<&Arc<Sequence>> {
        match self {
            Self::List(seq) => Ok(seq),
            other => Err(Error::mismatch("list", other.type_name())),
        }
    }

    pub fn as_array(&self) -> Result<&Arc<Sequence>> {
        match self {
            Self::Array(seq) => Ok(seq),
            other => Err(Error::mismatch("array", other.type_name())),
        }
    }

    /// List or array storage.
    pub fn as_sequence(&self) -> Result<&Arc<Sequence>> {
        match self {
            Self::List(seq) | Self::Array(seq) => Ok(seq),
            other => Err(Error::mismatch("list or array", other.type_name())),
        }
    }

    pub fn as_map(&self) -> Result<&Arc<MapValue>> {
        match self {
            Self::Map(map) => Ok(map),
            other => Err(Error::mismatch("map", other.type_name())),
        }
    }

    pub fn as_variable(&self) -> Result<&Arc<Variable>> {
        match self {
            Self::Variable(holder) => Ok(holder),
            other => Err(Error::mismatch(builtin::VARIABLE, other.type_name())),
        }
    }

    /// Primitive kind of an inline scalar.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Bool(_) => Some(PrimitiveKind::Bool),
            Self::I8(_) => Some(PrimitiveKind::I8),
            Self::I16(_) => Some(PrimitiveKind::I16),
            Self::I32(_) => Some(PrimitiveKind::I32),
            Self::I64(_) => Some(PrimitiveKind::I64),
            Self::F32(_) => Some(PrimitiveKind::F32),
            Self::F64(_) => Some(PrimitiveKind::F64),
            Self::Char(_) => Some(PrimitiveKind::Char),
            _ => None,
        }
    }

    /// Class of the value at runtime. Scalars report their boxed wrapper.
    pub fn runtime_class(&self) -> Option<ClassId> {
        if let Some(kind) = self.primitive_kind() {
            return Some(ClassId::new(builtin::wrapper_of(kind)));
        }
        match self {
            Self::String(_) => Some(ClassId::new(builtin::STRING)),
            Self::Enum { class, .. } => Some(class.clone()),
            Self::Object(object) => Some(object.class().clone()),
            Self::List(seq) | Self::Array(seq) => Some(seq.class().clone()),
            Self::Map(map) => Some(map.class().clone()),
            Self::Variable(_) => Some(ClassId::new(builtin::VARIABLE)),
            _ => None,
        }
    }

    /// Runtime class name, or `"null"`.
    pub fn type_name(&self) -> String {
        self.runtime_class()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "null".to_string())
    }
}

// Scalars compare by value (floats bitwise); references by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (
                Self::Enum {
                    class: a,
                    constant: x,
                },
                Self::Enum {
                    class: b,
                    constant: y,
                },
            ) => a == b && x == y,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) | (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b),
            (Self::Variable(a), Self::Variable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::F32(v) => v.to_bits().hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::Char(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::Enum { class, constant } => {
                class.hash(state);
                constant.hash(state);
            }
            Self::Object(v) => (Arc::as_ptr(v) as usize).hash(state),
            Self::List(v) | Self::Array(v) => (Arc::as_ptr(v) as usize).hash(state),
            Self::Map(v) => (Arc::as_ptr(v) as usize).hash(state),
            Self::Variable(v) => (Arc::as_ptr(v) as usize).hash(state),
        }
    }
}

/// Object instance: runtime class plus named slots.
#[derive(Debug)]
pub struct Object {
    class: ClassId,
    slots: RwLock<HashMap<Arc<str>, Value>>,
}

impl Object {
    pub fn new(class: ClassId, slots: HashMap<Arc<str>, Value>) -> Self {
        Self {
            class,
            slots: RwLock::new(slots),
        }
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Slot value, `None` when the slot does not exist.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slots.read().get(name).cloned()
    }

    /// Write a slot, returning the previous value.
    pub fn set(&self, name: &str, value: Value) -> Option<Value> {
        let mut slots = self.slots.write();
        match slots.get_mut(name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => slots.insert(Arc::from(name), value),
        }
    }

    /// Slot names, sorted.
    pub fn slot_names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.slots.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Ordered storage of a list or array.
#[derive(Debug)]
pub struct Sequence {
    class: ClassId,
    items: RwLock<Vec<Value>>,
}

impl Sequence {
    pub fn new(class: ClassId, items: Vec<Value>) -> Self {
        Self {
            class,
            items: RwLock::new(items),
        }
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Write `index`, padding with nulls when it lies past the end. Fails
    /// with [`Error::Capacity`] when the padding cannot be allocated.
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let mut items = self.items.write();
        if index >= items.len() {
            let end = index.checked_add(1).ok_or(Error::Capacity { index })?;
            let additional = end - items.len();
            items
                .try_reserve_exact(additional)
                .map_err(|_| Error::Capacity { index })?;
            items.resize(end, Value::Null);
        }
        items[index] = value;
        Ok(())
    }

    pub fn push(&self, value: Value) {
        self.items.write().push(value);
    }

    /// Snapshot of the items.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }
}

/// Key/value storage of a map.
#[derive(Debug)]
pub struct MapValue {
    class: ClassId,
    entries: RwLock<HashMap<Value, Value>>,
}

impl MapValue {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        self.entries.write().insert(key, value)
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        self.entries.write().remove(key)
    }

    /// Snapshot of the entries, in unspecified order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
