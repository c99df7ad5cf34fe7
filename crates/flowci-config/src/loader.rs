// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! The TOML file itself is located with the resource resolver:
//! `$FLOWCI_CONFIG` > `-D flowci.config=...` > `/etc/flowci/flowci.toml` >
//! `./flowci.toml` > the built-in `flowci-default.toml`. `FLOWCI_*`
//! environment variables override individual keys on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use flowci_resource::{
    Resource, ResourceBundle, ResourceConfig, ResourceResolver, SystemProperties,
};

use crate::model::FlowciConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FLOWCI_CONFIG";
/// Property naming the config file.
pub const CONFIG_PROPERTY: &str = "flowci.config";
/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/flowci/flowci.toml";
/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "flowci.toml";
/// Name of the embedded default config.
pub const DEFAULT_CONFIG_NAME: &str = "flowci-default.toml";

const DEFAULT_CONFIG: &[u8] = include_bytes!("../flowci-default.toml");

/// Resolver that locates the flowci config file.
pub fn config_resolver(properties: SystemProperties) -> ResourceResolver {
    ResourceResolver::new(
        ResourceConfig::default()
            .with_env_name(CONFIG_ENV)
            .with_property_name(CONFIG_PROPERTY)
            .with_default_dir(SYSTEM_CONFIG_PATH)
            .with_classpath(CONFIG_FILE_NAME)
            .with_default(DEFAULT_CONFIG_NAME),
    )
    .with_properties(properties)
    .with_bundle(
        ResourceBundle::new()
            .with_embedded(DEFAULT_CONFIG_NAME, DEFAULT_CONFIG)
            .with_root("."),
    )
}

/// Build the Figment for a located config source (exposed for diagnostic use).
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `toml_content`, if any
/// 3. `FLOWCI_*` environment variables
pub fn build_figment(toml_content: Option<&str>) -> Figment {
    let figment = Figment::new().merge(Serialized::defaults(FlowciConfig::default()));
    let figment = match toml_content {
        Some(content) => figment.merge(Toml::string(content)),
        None => figment,
    };
    figment.merge(env_provider())
}

/// Load configuration from a TOML string only (no env overrides).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FlowciConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FlowciConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an already-resolved resource with env var overrides.
pub fn load_config_from_resource(
    resource: &Resource,
) -> Result<FlowciConfig, LoadError> {
    let content = resource.read_to_string().map_err(LoadError::Read)?;
    build_figment(Some(&content))
        .extract()
        .map_err(|err| LoadError::Parse { err, content })
}

/// Failure while loading a located config resource.
#[derive(Debug)]
pub enum LoadError {
    /// The resource could not be read.
    Read(flowci_core::FlowError),
    /// The content did not deserialize; carries the content for span lookup.
    Parse { err: figment::Error, content: String },
}

/// Create the environment variable provider.
///
/// Uses an explicit section mapping instead of `Env::split("_")` so that
/// `FLOWCI_PLUGIN_CACHE_FILE` maps to `plugin.cache_file`, not
/// `plugin.cache.file`. Variables outside a known section (including
/// `FLOWCI_CONFIG` itself) are ignored.
fn env_provider() -> Env {
    Env::prefixed("FLOWCI_").filter_map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        ["log_", "plugin_", "resource_"]
            .iter()
            .find(|prefix| key_str.starts_with(**prefix))
            .map(|prefix| {
                let section = prefix.trim_end_matches('_');
                format!("{section}.{}", &key_str[prefix.len()..]).into()
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use flowci_resource::ResourceSource;

    #[test]
    fn embedded_default_parses() {
        let content = std::str::from_utf8(DEFAULT_CONFIG).unwrap();
        let config = load_config_from_str(content).expect("embedded default must parse");
        let mut expected = FlowciConfig::default();
        expected.resource.search_roots = vec![".".to_string()];
        assert_eq!(config, expected);
    }

    #[test]
    fn env_provider_maps_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FLOWCI_PLUGIN_CACHE_FILE", "/tmp/cache.json");
            jail.set_env("FLOWCI_LOG_LEVEL", "debug");
            jail.set_env("FLOWCI_CONFIG", "/ignored.toml");
            jail.set_env("FLOWCI_UNRELATED", "ignored");

            let config: FlowciConfig = build_figment(None).extract()?;
            assert_eq!(config.plugin.cache_file, "/tmp/cache.json");
            assert_eq!(config.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn config_resolver_falls_back_to_embedded_default() {
        figment::Jail::expect_with(|_jail| {
            // Jail runs in an empty temp dir, so ./flowci.toml is absent.
            let resolved = config_resolver(SystemProperties::new())
                .resolve()
                .expect("embedded default always resolves");
            if Path::new(SYSTEM_CONFIG_PATH).exists() {
                assert_eq!(resolved.source(), ResourceSource::DefaultDirectory);
            } else {
                assert_eq!(resolved.source(), ResourceSource::ClasspathDefault);
            }
            Ok(())
        });
    }
}
