// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model registry configuration.
//!
//! # Sources
//!
//! - **Defaults**: [`ModelConfig::default`]
//! - **Environment**: `PROPMODEL_*` variables via [`ModelConfig::from_env`]
//! - **YAML**: [`ModelConfig::from_yaml_str`] / [`ModelConfig::from_file`]
//!   (feature `config-loaders`)
//!
//! A registry holds its configuration in an `ArcSwap`, so
//! [`ModelRegistry::set_config`](crate::ModelRegistry::set_config) is
//! visible to subsequent scans and container writes without locking readers.
//!
//! # Example
//!
//! ```yaml
//! max_sequence_growth: 1024
//! include_private_accessors: false
//! log_scans: true
//! ```

use crate::error::{Error, Result};

/// Environment variable for [`ModelConfig::max_sequence_growth`].
pub const ENV_MAX_SEQUENCE_GROWTH: &str = "PROPMODEL_MAX_SEQUENCE_GROWTH";
/// Environment variable for [`ModelConfig::include_private_accessors`].
pub const ENV_PRIVATE_ACCESSORS: &str = "PROPMODEL_PRIVATE_ACCESSORS";
/// Environment variable for [`ModelConfig::log_scans`].
pub const ENV_LOG_SCANS: &str = "PROPMODEL_LOG_SCANS";

/// Tunables of a [`ModelRegistry`](crate::ModelRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ModelConfig {
    /// Largest number of slots a single list/array write may append.
    /// `None` means unbounded.
    pub max_sequence_growth: Option<usize>,
    /// Also consider private methods as accessor candidates.
    pub include_private_accessors: bool,
    /// Log each completed property scan at debug level.
    pub log_scans: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_sequence_growth: None,
            include_private_accessors: false,
            log_scans: true,
        }
    }
}

impl ModelConfig {
    pub fn with_max_sequence_growth(mut self, limit: usize) -> Self {
        self.max_sequence_growth = Some(limit);
        self
    }

    pub fn with_private_accessors(mut self, enabled: bool) -> Self {
        self.include_private_accessors = enabled;
        self
    }

    /// Defaults overridden by `PROPMODEL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_SEQUENCE_GROWTH) {
            let raw = raw.trim();
            config.max_sequence_growth = match raw {
                "" | "none" | "unbounded" => None,
                _ => Some(raw.parse().map_err(|e| {
                    Error::Config(format!("{}={:?}: {}", ENV_MAX_SEQUENCE_GROWTH, raw, e))
                })?),
            };
        }
        if let Some(raw) = lookup(ENV_PRIVATE_ACCESSORS) {
            config.include_private_accessors = parse_flag(ENV_PRIVATE_ACCESSORS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_SCANS) {
            config.log_scans = parse_flag(ENV_LOG_SCANS, &raw)?;
        }
        Ok(config)
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Load a YAML file.
    #[cfg(feature = "config-loaders")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "{}={:?}: expected a boolean",
            key, other
        ))),
    }
}
