// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authoritative backing stores for plugin records.

use async_trait::async_trait;
use flowci_core::FlowError;

use crate::model::Plugin;

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFilePluginStore;
pub use memory::MemoryPluginStore;
pub use sqlite::SqlitePluginStore;

/// The durable source of plugin records that the cache is rebuilt from.
#[async_trait]
pub trait PluginStore: Send + Sync {
    /// Load every plugin record.
    async fn load_all(&self) -> Result<Vec<Plugin>, FlowError>;

    /// Upsert a record by name and return it as stored.
    async fn save(&self, plugin: Plugin) -> Result<Plugin, FlowError>;
}
