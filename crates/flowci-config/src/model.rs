// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::time::Duration;

use flowci_resource::{ResourceBundle, ResourceConfig, ResourceResolver, SystemProperties};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level flowci configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FlowciConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Plugin registry settings.
    #[serde(default)]
    pub plugin: PluginConfig,

    /// Application resource lookup used by `flowci resolve`.
    #[serde(default)]
    pub resource: ResourceSection,

    /// Properties consulted by the resolver's property source.
    /// `-D key=value` flags take precedence over these.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl FlowciConfig {
    /// Config properties overlaid with `overrides`.
    pub fn system_properties(&self, overrides: &SystemProperties) -> SystemProperties {
        let mut props: SystemProperties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        props.extend(overrides.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        props
    }

    /// Resolver for the `[resource]` section, with `cli` overlaid on the configured sources.
    pub fn resource_resolver(
        &self,
        cli: &ResourceConfig,
        overrides: &SystemProperties,
    ) -> ResourceResolver {
        let bundle = self
            .resource
            .search_roots
            .iter()
            .fold(ResourceBundle::new(), |bundle, root| bundle.with_root(root));

        ResourceResolver::new(self.resource.lookup().merged_with(cli))
            .with_properties(self.system_properties(overrides))
            .with_bundle(bundle)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which backing store holds plugin records.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    /// Process-local; nothing survives a restart.
    Memory,
    /// A single JSON document at `store_path`.
    #[default]
    Json,
    /// A SQLite database at `store_path`.
    Sqlite,
}

/// Plugin registry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Backing store kind.
    #[serde(default)]
    pub store: StoreKind,

    /// Path of the JSON document or SQLite database. Ignored for `memory`.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Where the cache is dumped and warm-started from.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Bound on each backing store call, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Load the cache dump at startup instead of querying the store.
    #[serde(default = "default_warm_start")]
    pub warm_start: bool,
}

impl PluginConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            store_path: default_store_path(),
            cache_file: default_cache_file(),
            store_timeout_ms: default_store_timeout_ms(),
            warm_start: default_warm_start(),
        }
    }
}

fn default_store_path() -> String {
    "plugins.json".to_string()
}

fn default_cache_file() -> String {
    "plugin-cache.json".to_string()
}

fn default_store_timeout_ms() -> u64 {
    5000
}

fn default_warm_start() -> bool {
    true
}

/// The five resolver sources plus bundle search roots.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSection {
    /// Environment variable holding a path.
    #[serde(default)]
    pub env_name: Option<String>,

    /// Property holding a path.
    #[serde(default)]
    pub property_name: Option<String>,

    /// Literal path probed directly.
    #[serde(default)]
    pub default_dir: Option<String>,

    /// Entry name looked up under `search_roots`.
    #[serde(default)]
    pub classpath: Option<String>,

    /// Fallback entry name looked up under `search_roots`.
    #[serde(default)]
    pub default: Option<String>,

    /// Directories searched for bundled entries, in order.
    #[serde(default)]
    pub search_roots: Vec<String>,
}

impl ResourceSection {
    pub fn lookup(&self) -> ResourceConfig {
        ResourceConfig {
            env_name: self.env_name.clone(),
            property_name: self.property_name.clone(),
            default_dir: self.default_dir.clone(),
            classpath: self.classpath.clone(),
            default: self.default.clone(),
        }
    }
}
