// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-match-wins resolution over the five configured sources.
//!
//! Priority: environment variable, system property, default path, bundled
//! entry, bundled default. Each probe is a side-effect-free lookup and the
//! result is never cached, so two calls may disagree if the environment
//! changes in between.

use std::path::Path;

use flowci_core::FlowError;
use tracing::{debug, info};

use crate::bundle::ResourceBundle;
use crate::config::{ResourceConfig, ResourceSource};
use crate::properties::SystemProperties;
use crate::resource::Resource;

/// Resolve `config` against the process environment, `properties` and `bundle`.
///
/// Returns `None` when no source yields an existing resource. Absence is an
/// ordinary outcome and is never reported as an error here.
pub fn resolve(
    config: &ResourceConfig,
    properties: &SystemProperties,
    bundle: &ResourceBundle,
) -> Option<Resource> {
    for source in ResourceSource::ORDER {
        let Some(key) = config.key_for(source) else {
            continue;
        };
        if let Some(resource) = probe(source, key, properties, bundle) {
            info!(source = %source, location = %resource.location(), "resource resolved");
            return Some(resource);
        }
    }
    debug!(sources = %config.describe(), "no resource source matched");
    None
}

fn probe(
    source: ResourceSource,
    key: &str,
    properties: &SystemProperties,
    bundle: &ResourceBundle,
) -> Option<Resource> {
    match source {
        ResourceSource::EnvVar => {
            // Paths need not be UTF-8.
            let value = std::env::var_os(key);
            debug!(source = %source, key, value = ?value, "probing");
            existing_file(value.as_deref().map(Path::new), source)
        }
        ResourceSource::SystemProperty => {
            let value = properties.get(key);
            debug!(source = %source, key, value = ?value, "probing");
            existing_file(value.map(Path::new), source)
        }
        ResourceSource::DefaultDirectory => {
            debug!(source = %source, path = key, "probing");
            existing_file(Some(Path::new(key)), source)
        }
        ResourceSource::ClasspathEntry | ResourceSource::ClasspathDefault => {
            debug!(source = %source, name = key, "probing");
            bundle.lookup(key).map(|origin| Resource::Classpath {
                name: key.to_string(),
                origin,
                source,
            })
        }
    }
}

fn existing_file(path: Option<&Path>, source: ResourceSource) -> Option<Resource> {
    let path = path.filter(|p| !p.as_os_str().is_empty())?;
    path.exists().then(|| Resource::File {
        path: path.to_path_buf(),
        source,
    })
}

/// A resolver bound to its configuration and lookup context.
#[derive(Debug, Clone, Default)]
pub struct ResourceResolver {
    config: ResourceConfig,
    properties: SystemProperties,
    bundle: ResourceBundle,
}

impl ResourceResolver {
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: SystemProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_bundle(mut self, bundle: ResourceBundle) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Re-probe all sources. See [`resolve`].
    pub fn resolve(&self) -> Option<Resource> {
        resolve(&self.config, &self.properties, &self.bundle)
    }

    /// Like [`ResourceResolver::resolve`], for callers that treat absence as fatal.
    pub fn require(&self) -> Result<Resource, FlowError> {
        self.resolve().ok_or_else(|| FlowError::ConfigurationAbsent {
            sources: self.config.describe(),
        })
    }
}
