// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observable value holders and change signals.
//!
//! A [`Variable`] is the holder type behind observable properties: writing the
//! holder publishes the new value to every live [`Signal`]. Properties that
//! cannot be observed hand out [`Signal::never`].

use crate::value::Value;
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Holder of a single observable value.
pub struct Variable {
    value: RwLock<Value>,
    subscribers: Mutex<Vec<Sender<Value>>>,
}

impl Variable {
    pub fn new(value: impl Into<Value>) -> Arc<Self> {
        Arc::new(Self {
            value: RwLock::new(value.into()),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Current value.
    pub fn get(&self) -> Value {
        self.value.read().clone()
    }

    /// Replace the value and notify subscribers. Returns the previous value.
    pub fn set(&self, value: impl Into<Value>) -> Value {
        let value = value.into();
        let previous = std::mem::replace(&mut *self.value.write(), value.clone());
        // Disconnected receivers are pruned on publish.
        self.subscribers
            .lock()
            .retain(|tx| tx.send(value.clone()).is_ok());
        previous
    }

    /// Stream of values written after this call.
    pub fn observe(&self) -> Signal {
        let (tx, rx) = channel::unbounded();
        self.subscribers.lock().push(tx);
        Signal { rx }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &*self.value.read())
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

/// Receiving end of a change stream.
#[derive(Debug, Clone)]
pub struct Signal {
    rx: Receiver<Value>,
}

impl Signal {
    /// Signal that never emits.
    pub fn never() -> Self {
        Self {
            rx: channel::never(),
        }
    }

    /// Next pending value, without blocking.
    pub fn try_next(&self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Next value, waiting up to `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Value> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// All pending values.
    pub fn drain(&self) -> Vec<Value> {
        self.rx.try_iter().collect()
    }
}
