// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the flowci platform utilities.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), config file lookup through the resource resolver,
//! environment variable overrides, and diagnostic error rendering with typo
//! suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use flowci_config::load_and_validate;
//! use flowci_resource::SystemProperties;
//!
//! let loaded = load_and_validate(&SystemProperties::new()).expect("config errors");
//! println!("plugin store: {}", loaded.config.plugin.store);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use flowci_resource::{Resource, ResourceSource, SystemProperties};
use tracing::{debug, warn};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{
    config_resolver, load_config_from_resource, load_config_from_str,
    LoadError, CONFIG_ENV, CONFIG_PROPERTY,
};
pub use model::{FlowciConfig, LogConfig, PluginConfig, ResourceSection, StoreKind};

/// A validated configuration and the resource it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FlowciConfig,
    /// `None` when only compiled defaults and env overrides applied.
    pub source: Option<Resource>,
}

/// Locate, load and validate the configuration.
///
/// `properties` feeds the resolver's property source, so
/// `-D flowci.config=<path>` selects the file.
pub fn load_and_validate(properties: &SystemProperties) -> Result<LoadedConfig, Vec<ConfigError>> {
    let resolved = config_resolver(properties.clone()).resolve();

    if let Ok(requested) = std::env::var(CONFIG_ENV)
        && !requested.trim().is_empty()
        && resolved.as_ref().map(Resource::source) != Some(ResourceSource::EnvVar)
    {
        warn!(path = %requested, "{CONFIG_ENV} does not name an existing file; ignoring it");
    }

    let Some(resource) = resolved else {
        let config = loader::build_figment(None)
            .extract::<FlowciConfig>()
            .map_err(|err| diagnostic::figment_to_config_errors(err, None))?;
        validation::validate_config(&config)?;
        return Ok(LoadedConfig {
            config,
            source: None,
        });
    };

    debug!(location = %resource, "loading configuration");
    let config = match load_config_from_resource(&resource) {
        Ok(config) => config,
        Err(LoadError::Read(source)) => {
            return Err(vec![ConfigError::Unreadable {
                location: resource.location(),
                source,
            }]);
        }
        Err(LoadError::Parse { err, content }) => {
            let name = resource.location();
            return Err(diagnostic::figment_to_config_errors(
                err,
                Some((name.as_str(), content.as_str())),
            ));
        }
    };

    validation::validate_config(&config)?;
    Ok(LoadedConfig {
        config,
        source: Some(resource),
    })
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<FlowciConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            Some(("<inline>", toml_content)),
        )),
    }
}
