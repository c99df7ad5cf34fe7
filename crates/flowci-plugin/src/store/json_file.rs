// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store keeping every plugin record in a single JSON document.
//!
//! A missing file is an empty store. Saves rewrite the whole document
//! atomically and are serialized by an in-process lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use flowci_core::FlowError;
use tokio::sync::Mutex;
use tracing::debug;

use super::PluginStore;
use crate::fs::{read_optional, write_atomic};
use crate::model::Plugin;

#[derive(Debug)]
pub struct JsonFilePluginStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePluginStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Vec<Plugin>, FlowError> {
        let Some(bytes) = read_optional(&self.path).await? else {
            debug!(path = %self.path.display(), "plugin store file absent, treating as empty");
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            FlowError::Serialization(format!("{}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl PluginStore for JsonFilePluginStore {
    async fn load_all(&self) -> Result<Vec<Plugin>, FlowError> {
        self.read_document().await
    }

    async fn save(&self, mut plugin: Plugin) -> Result<Plugin, FlowError> {
        let _guard = self.write_lock.lock().await;

        let mut plugins: BTreeMap<String, Plugin> = self
            .read_document()
            .await?
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        plugin.updated_at = Some(Utc::now());
        plugins.insert(plugin.name.clone(), plugin.clone());

        let records: Vec<&Plugin> = plugins.values().collect();
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| FlowError::Serialization(format!("encoding plugin store: {e}")))?;
        write_atomic(&self.path, &bytes).await?;
        Ok(plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowci_core::PluginStatus;

    #[tokio::test]
    async fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePluginStore::new(dir.path().join("plugins.json"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.json");

        let store = JsonFilePluginStore::new(&path);
        store
            .save(Plugin::new("docker-plugin", PluginStatus::Pending).with_tag("v1.0"))
            .await
            .unwrap();
        store
            .save(Plugin::new("fir-plugin", PluginStatus::Installed))
            .await
            .unwrap();
        store
            .save(Plugin::new("docker-plugin", PluginStatus::Installing))
            .await
            .unwrap();

        let reopened = JsonFilePluginStore::new(&path);
        let all = reopened.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "docker-plugin");
        assert_eq!(all[0].status, PluginStatus::Installing);
        assert!(all[0].tag.is_none(), "save replaces the whole record");
        assert!(all.iter().all(|p| p.updated_at.is_some()));
    }

    #[tokio::test]
    async fn corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFilePluginStore::new(&path);
        assert!(matches!(
            store.load_all().await.unwrap_err(),
            FlowError::Serialization(_)
        ));
    }
}
