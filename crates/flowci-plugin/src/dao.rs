// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-access contract for the plugin registry.

use async_trait::async_trait;
use flowci_core::{FlowError, PluginStatus};

use crate::model::Plugin;

/// Registry access: reads are served from a cache, writes go through to the
/// backing store.
#[async_trait]
pub trait PluginDao: Send + Sync {
    /// List plugins whose status is in `statuses`; an empty slice lists all.
    ///
    /// Ordering is by name and stable within one cache generation.
    async fn list(&self, statuses: &[PluginStatus]) -> Result<Vec<Plugin>, FlowError>;

    /// Exact-match lookup by name. Unknown names yield [`FlowError::NotFound`].
    async fn get(&self, name: &str) -> Result<Plugin, FlowError>;

    /// Upsert `plugin` into the store and the cache, returning the stored record.
    ///
    /// A missing name yields [`FlowError::InvalidArgument`].
    async fn update(&self, plugin: Plugin) -> Result<Plugin, FlowError>;

    /// Persist the whole cache so a restart can warm-start from it.
    async fn dump_cache_to_file(&self) -> Result<(), FlowError>;

    /// Rebuild the cache from the backing store, replacing every entry.
    async fn refresh_cache(&self) -> Result<(), FlowError>;
}
