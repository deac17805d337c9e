// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions between Rust values and [`Value`].

use super::{MapValue, Object, ObjectRef, Sequence, Value};
use crate::error::{Error, Result};
use crate::observe::Variable;
use std::sync::Arc;

/// Trait for converting from [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(Error::mismatch($name, other.type_name())),
                }
            }
        }
    };
}

impl_scalar!(bool, Bool, "bool");
impl_scalar!(i8, I8, "i8");
impl_scalar!(i16, I16, "i16");
impl_scalar!(i32, I32, "i32");
impl_scalar!(i64, I64, "i64");
impl_scalar!(f32, F32, "f32");
impl_scalar!(f64, F64, "f64");
impl_scalar!(char, Char, "char");

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Enum { constant, .. } => Ok(constant.to_string()),
            other => Err(Error::mismatch("String", other.type_name())),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_sequence()?
            .to_vec()
            .iter()
            .map(T::from_value)
            .collect()
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(Arc::new(v))
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<Arc<Variable>> for Value {
    fn from(v: Arc<Variable>) -> Self {
        Self::Variable(v)
    }
}

impl From<MapValue> for Value {
    fn from(v: MapValue) -> Self {
        Self::Map(Arc::new(v))
    }
}

impl From<Sequence> for Value {
    fn from(v: Sequence) -> Self {
        Self::List(Arc::new(v))
    }
}

impl Value {
    /// Convert to a Rust value.
    pub fn to<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }
}
