// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{FlowciConfig, StoreKind};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &FlowciConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.plugin.store_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "plugin.store_timeout_ms must be greater than 0".to_string(),
        });
    }

    if config.plugin.cache_file.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "plugin.cache_file must not be empty".to_string(),
        });
    }

    if config.plugin.store != StoreKind::Memory && config.plugin.store_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!(
                "plugin.store_path must not be empty for the `{}` store",
                config.plugin.store
            ),
        });
    }

    for (i, root) in config.resource.search_roots.iter().enumerate() {
        if root.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("resource.search_roots[{i}] must not be empty"),
            });
        }
    }

    if config.properties.keys().any(|k| k.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "properties must not contain an empty key".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
