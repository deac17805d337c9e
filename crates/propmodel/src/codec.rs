// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Text codecs for atomic types.
//!
//! A class with a codec is atomic: its model has no properties. Map models
//! also use the key model's codec to turn property names into keys.
//!
//! Built-in codecs cover primitives, their wrappers, `String` and every enum.
//! Additional codecs are registered per class with [`CodecRegistry::register`].

use crate::error::{Error, Result};
use crate::types::{builtin, Class, ClassId, ClassKind, PrimitiveKind};
use crate::value::Value;
use dashmap::DashMap;
use std::sync::Arc;

/// String conversion for an atomic type.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String>;
    fn decode(&self, text: &str) -> Result<Value>;
}

struct PrimitiveCodec {
    kind: PrimitiveKind,
    type_name: &'static str,
}

impl PrimitiveCodec {
    fn failed(&self, text: &str) -> Error {
        Error::Codec {
            type_name: self.type_name.to_string(),
            input: text.to_string(),
        }
    }
}

impl Codec for PrimitiveCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        if value.primitive_kind() != Some(self.kind) {
            return Err(Error::mismatch(self.type_name, value.type_name()));
        }
        Ok(match value {
            Value::Bool(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            other => return Err(Error::mismatch(self.type_name, other.type_name())),
        })
    }

    fn decode(&self, text: &str) -> Result<Value> {
        let trimmed = text.trim();
        let value = match self.kind {
            PrimitiveKind::Bool => trimmed.parse().map(Value::Bool).ok(),
            PrimitiveKind::I8 => trimmed.parse().map(Value::I8).ok(),
            PrimitiveKind::I16 => trimmed.parse().map(Value::I16).ok(),
            PrimitiveKind::I32 => trimmed.parse().map(Value::I32).ok(),
            PrimitiveKind::I64 => trimmed.parse().map(Value::I64).ok(),
            PrimitiveKind::F32 => trimmed.parse().map(Value::F32).ok(),
            PrimitiveKind::F64 => trimmed.parse().map(Value::F64).ok(),
            PrimitiveKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
        };
        value.ok_or_else(|| self.failed(text))
    }
}

struct StringCodec;

impl Codec for StringCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::mismatch(builtin::STRING, value.type_name()))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        Ok(Value::String(text.to_string()))
    }
}

struct EnumCodec {
    class: ClassId,
    constants: Vec<Arc<str>>,
}

impl Codec for EnumCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        match value {
            Value::Enum { class, constant } if *class == self.class => Ok(constant.to_string()),
            other => Err(Error::mismatch(&self.class, other.type_name())),
        }
    }

    fn decode(&self, text: &str) -> Result<Value> {
        self.constants
            .iter()
            .find(|c| &***c == text)
            .map(|c| Value::enumeration(self.class.clone(), c))
            .ok_or_else(|| Error::Codec {
                type_name: self.class.to_string(),
                input: text.to_string(),
            })
    }
}

/// Codec from a pair of closures.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D>
where
    E: Fn(&Value) -> Result<String> + Send + Sync,
    D: Fn(&str) -> Result<Value> + Send + Sync,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<E, D> Codec for FnCodec<E, D>
where
    E: Fn(&Value) -> Result<String> + Send + Sync,
    D: Fn(&str) -> Result<Value> + Send + Sync,
{
    fn encode(&self, value: &Value) -> Result<String> {
        (self.encode)(value)
    }

    fn decode(&self, text: &str) -> Result<Value> {
        (self.decode)(text)
    }
}

/// Per-class codec lookup.
pub struct CodecRegistry {
    codecs: DashMap<ClassId, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry with the built-in codecs.
    pub fn new() -> Self {
        let codecs: DashMap<ClassId, Arc<dyn Codec>> = DashMap::new();
        for kind in PrimitiveKind::ALL {
            for type_name in [builtin::primitive_of(kind), builtin::wrapper_of(kind)] {
                codecs.insert(
                    ClassId::new(type_name),
                    Arc::new(PrimitiveCodec { kind, type_name }),
                );
            }
        }
        codecs.insert(ClassId::new(builtin::STRING), Arc::new(StringCodec));
        Self { codecs }
    }

    /// Register (or replace) the codec for `class`.
    ///
    /// Must happen before the first model of `class` is built; cached models
    /// keep the codec they were created with.
    pub fn register(&self, class: impl Into<ClassId>, codec: Arc<dyn Codec>) {
        let class = class.into();
        log::debug!("[codec] registered codec for {}", class);
        self.codecs.insert(class, codec);
    }

    /// Codec for `class`: explicit registration first, then derived for enums.
    pub fn find(&self, class: &Class) -> Option<Arc<dyn Codec>> {
        if let Some(codec) = self.codecs.get(&class.id) {
            return Some(Arc::clone(codec.value()));
        }
        match &class.kind {
            ClassKind::Enum { constants } => Some(Arc::new(EnumCodec {
                class: class.id.clone(),
                constants: constants.clone(),
            })),
            _ => None,
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
