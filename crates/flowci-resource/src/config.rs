// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-source lookup configuration for the resolver.

use serde::{Deserialize, Serialize};

/// One of the five places a resource can be resolved from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceSource {
    EnvVar,
    SystemProperty,
    DefaultDirectory,
    ClasspathEntry,
    ClasspathDefault,
}

impl ResourceSource {
    /// All sources, highest priority first.
    pub const ORDER: [ResourceSource; 5] = [
        ResourceSource::EnvVar,
        ResourceSource::SystemProperty,
        ResourceSource::DefaultDirectory,
        ResourceSource::ClasspathEntry,
        ResourceSource::ClasspathDefault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceSource::EnvVar => "env",
            ResourceSource::SystemProperty => "property",
            ResourceSource::DefaultDirectory => "default-dir",
            ResourceSource::ClasspathEntry => "classpath",
            ResourceSource::ClasspathDefault => "default",
        }
    }
}

impl std::fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names the lookup key or literal path for each source.
///
/// A `None` field disables that source entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// Environment variable holding a filesystem path.
    #[serde(default)]
    pub env_name: Option<String>,

    /// System property holding a filesystem path.
    #[serde(default)]
    pub property_name: Option<String>,

    /// Literal filesystem path probed directly, without any override.
    #[serde(default)]
    pub default_dir: Option<String>,

    /// Bundled entry name.
    #[serde(default)]
    pub classpath: Option<String>,

    /// Built-in bundled entry used as the last resort.
    #[serde(default)]
    pub default: Option<String>,
}

impl ResourceConfig {
    pub fn with_env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = Some(name.into());
        self
    }

    pub fn with_default_dir(mut self, path: impl Into<String>) -> Self {
        self.default_dir = Some(path.into());
        self
    }

    pub fn with_classpath(mut self, name: impl Into<String>) -> Self {
        self.classpath = Some(name.into());
        self
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    /// The configured key or path for `source`, if any.
    pub fn key_for(&self, source: ResourceSource) -> Option<&str> {
        match source {
            ResourceSource::EnvVar => self.env_name.as_deref(),
            ResourceSource::SystemProperty => self.property_name.as_deref(),
            ResourceSource::DefaultDirectory => self.default_dir.as_deref(),
            ResourceSource::ClasspathEntry => self.classpath.as_deref(),
            ResourceSource::ClasspathDefault => self.default.as_deref(),
        }
    }

    /// Human-readable list of enabled sources, e.g. `env:APP_CFG, default:app.toml`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = ResourceSource::ORDER
            .iter()
            .filter_map(|s| self.key_for(*s).map(|k| format!("{s}:{k}")))
            .collect();
        if parts.is_empty() {
            "no sources configured".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Overlay every field set in `other` on top of `self`.
    pub fn merged_with(mut self, other: &ResourceConfig) -> Self {
        if other.env_name.is_some() {
            self.env_name = other.env_name.clone();
        }
        if other.property_name.is_some() {
            self.property_name = other.property_name.clone();
        }
        if other.default_dir.is_some() {
            self.default_dir = other.default_dir.clone();
        }
        if other.classpath.is_some() {
            self.classpath = other.classpath.clone();
        }
        if other.default.is_some() {
            self.default = other.default.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_enabled_sources_in_order() {
        let cfg = ResourceConfig::default()
            .with_default("app-default.toml")
            .with_env_name("APP_CFG");
        assert_eq!(cfg.describe(), "env:APP_CFG, default:app-default.toml");
    }

    #[test]
    fn describe_empty_config() {
        assert_eq!(ResourceConfig::default().describe(), "no sources configured");
    }

    #[test]
    fn merged_with_only_overrides_set_fields() {
        let base = ResourceConfig::default()
            .with_env_name("A")
            .with_classpath("base.toml");
        let overlay = ResourceConfig::default().with_classpath("other.toml");
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.env_name.as_deref(), Some("A"));
        assert_eq!(merged.classpath.as_deref(), Some("other.toml"));
        assert!(merged.default.is_none());
    }
}
