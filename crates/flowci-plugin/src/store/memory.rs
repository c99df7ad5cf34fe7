// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process store, used by tests and the `memory` store kind.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use flowci_core::FlowError;
use tokio::sync::RwLock;

use super::PluginStore;
use crate::model::Plugin;

#[derive(Debug, Default)]
pub struct MemoryPluginStore {
    plugins: RwLock<BTreeMap<String, Plugin>>,
}

impl MemoryPluginStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `plugins`, stored verbatim.
    pub fn with_plugins(plugins: impl IntoIterator<Item = Plugin>) -> Self {
        Self {
            plugins: RwLock::new(plugins.into_iter().map(|p| (p.name.clone(), p)).collect()),
        }
    }

    /// Write a record without stamping it, as an external process would.
    pub async fn put(&self, plugin: Plugin) {
        self.plugins.write().await.insert(plugin.name.clone(), plugin);
    }

    pub async fn remove(&self, name: &str) -> Option<Plugin> {
        self.plugins.write().await.remove(name)
    }

    pub async fn len(&self) -> usize {
        self.plugins.read().await.len()
    }
}

#[async_trait]
impl PluginStore for MemoryPluginStore {
    async fn load_all(&self) -> Result<Vec<Plugin>, FlowError> {
        Ok(self.plugins.read().await.values().cloned().collect())
    }

    async fn save(&self, mut plugin: Plugin) -> Result<Plugin, FlowError> {
        plugin.updated_at = Some(Utc::now());
        self.plugins
            .write()
            .await
            .insert(plugin.name.clone(), plugin.clone());
        Ok(plugin)
    }
}
