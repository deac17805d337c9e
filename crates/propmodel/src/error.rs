// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the class table, resolver and model registry.
//!
//! Absent lookups (unknown property name, non-numeric index, missing map key)
//! are *not* errors: they surface as `None` / [`Value::Null`](crate::Value::Null).
//! Everything here is either a declaration problem, a caller passing a value of
//! the wrong type, or an internal failure that a well-formed class table never
//! produces (see [`Error::is_internal`]).

use std::fmt;

/// Errors returned by propmodel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Declaration Errors
    // ========================================================================
    /// Class is not declared in the class table.
    UnknownClass(String),
    /// A class with this id is already declared.
    DuplicateClass(String),
    /// Declaration is structurally invalid (e.g. record without components).
    InvalidDeclaration(String),
    /// No method with this name and arity on the receiver's class hierarchy.
    NoSuchMethod { class: String, method: String },

    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// Value does not conform to the property's value type.
    TypeMismatch { expected: String, got: String },
    /// Text could not be converted by the type's codec.
    Codec { type_name: String, input: String },
    /// Grow-on-write index exceeds the configured growth limit.
    GrowthLimit { index: usize, limit: usize },
    /// Grow-on-write index cannot be allocated.
    Capacity { index: usize },
    /// Configuration could not be loaded or parsed.
    Config(String),

    // ========================================================================
    // Internal Errors
    // ========================================================================
    /// Type variable could not be resolved anywhere in the hierarchy.
    UnresolvedVariable { variable: String, site: String },
    /// Introspection failed on a member that the scan considered accessible.
    Introspection { member: String, cause: String },
    /// Model outlived the registry that created it.
    RegistryDropped,
    /// Unexpected internal failure.
    Internal(String),
}

impl Error {
    /// Whether this error signals a bug in the engine or a malformed class table
    /// rather than a caller mistake.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedVariable { .. }
                | Self::Introspection { .. }
                | Self::RegistryDropped
                | Self::Internal(_)
        )
    }

    pub(crate) fn mismatch(expected: impl fmt::Display, got: impl fmt::Display) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    pub(crate) fn introspection(member: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::Introspection {
            member: member.into(),
            cause: cause.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClass(id) => write!(f, "Unknown class: {}", id),
            Self::DuplicateClass(id) => write!(f, "Class already declared: {}", id),
            Self::InvalidDeclaration(msg) => write!(f, "Invalid declaration: {}", msg),
            Self::NoSuchMethod { class, method } => {
                write!(f, "No method {} on {}", method, class)
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::Codec { type_name, input } => {
                write!(f, "Cannot decode {:?} as {}", input, type_name)
            }
            Self::GrowthLimit { index, limit } => {
                write!(f, "Index {} exceeds sequence growth limit {}", index, limit)
            }
            Self::Capacity { index } => write!(f, "Cannot grow sequence to index {}", index),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::UnresolvedVariable { variable, site } => write!(
                f,
                "Unexpected internal failure: type variable {} unresolvable from {}",
                variable, site
            ),
            Self::Introspection { member, cause } => write!(
                f,
                "Unexpected internal failure: introspection of {} failed: {}",
                member, cause
            ),
            Self::RegistryDropped => {
                write!(f, "Unexpected internal failure: model registry was dropped")
            }
            Self::Internal(msg) => write!(f, "Unexpected internal failure: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for propmodel operations.
pub type Result<T> = std::result::Result<T, Error>;
