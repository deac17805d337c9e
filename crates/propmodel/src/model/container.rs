// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthesized properties of list, array and map models.

use super::{Model, Property};
use crate::error::{Error, Result};
use crate::value::Value;
use std::sync::Arc;

/// Non-negative decimal index below `usize::MAX`, `None` for anything else.
pub(crate) fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok().filter(|index| *index < usize::MAX)
}

/// Element `index` of a list or array. Writes past the end pad with nulls,
/// appending at most `limit` slots when a limit is set.
pub(crate) fn index_property(item: &Arc<Model>, index: usize, limit: Option<usize>) -> Property {
    Property::new(
        Arc::clone(item),
        index.to_string(),
        Arc::new(move |instance: &Value| -> Result<Value> {
            Ok(instance.as_sequence()?.get(index).unwrap_or(Value::Null))
        }),
        Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
            let sequence = instance.as_sequence()?;
            let len = sequence.len();
            if index >= len {
                let end = index.checked_add(1).ok_or(Error::Capacity { index })?;
                let growth = end - len;
                if let Some(limit) = limit.filter(|limit| growth > *limit) {
                    log::warn!(
                        "[model] refusing to grow {} from {} to {} slots (limit {})",
                        sequence.class(),
                        len,
                        end,
                        limit
                    );
                    return Err(Error::GrowthLimit { index, limit });
                }
                if growth > 1 {
                    log::trace!("[model] growing {} from {} to {} slots", sequence.class(), len, end);
                }
            }
            sequence.set(index, value)?;
            Ok(instance.clone())
        }),
    )
}

/// Entry `key` of a map, named by the key's text form.
pub(crate) fn key_property(value_model: &Arc<Model>, name: &str, key: Value) -> Property {
    let read_key = key.clone();
    Property::new(
        Arc::clone(value_model),
        name,
        Arc::new(move |instance: &Value| -> Result<Value> {
            Ok(instance.as_map()?.get(&read_key).unwrap_or(Value::Null))
        }),
        Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
            instance.as_map()?.insert(key.clone(), value);
            Ok(instance.clone())
        }),
    )
}
