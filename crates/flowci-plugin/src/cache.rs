// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Copy-on-write snapshot cache in front of a [`PluginStore`].
//!
//! The visible [`Snapshot`] lives in an `ArcSwap`. Readers load the current
//! pointer and never block. Writers (`update`, `refresh_cache`, warm start)
//! hold a writer lock, build a complete new snapshot off to the side and swap
//! it in, so a reader sees either the old or the new snapshot and never a mix.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flowci_core::{FlowError, PluginStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::dao::PluginDao;
use crate::fs::{read_optional, write_atomic};
use crate::model::Plugin;
use crate::store::PluginStore;

/// Default bound on a single backing-store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning for [`CachedPluginDao`].
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Where `dump_cache_to_file` writes and warm start reads.
    pub cache_file: PathBuf,
    /// Bound on each `load_all` / `save` call against the store.
    pub store_timeout: Duration,
    /// Whether [`CachedPluginDao::open`] may skip the store and load the dump.
    pub warm_start: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from("plugin-cache.json"),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            warm_start: true,
        }
    }
}

/// Immutable point-in-time view of the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    generation: u64,
    plugins: BTreeMap<String, Plugin>,
}

impl Snapshot {
    fn next(previous: &Snapshot, plugins: BTreeMap<String, Plugin>) -> Self {
        Self {
            generation: previous.generation + 1,
            plugins,
        }
    }

    /// Increases by one on every swap. The empty initial snapshot is generation 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Plugins whose status is in `statuses`, by name. Empty `statuses` means all.
    pub fn filtered(&self, statuses: &[PluginStatus]) -> Vec<Plugin> {
        self.plugins
            .values()
            .filter(|p| statuses.is_empty() || statuses.contains(&p.status))
            .cloned()
            .collect()
    }
}

/// On-disk form of a dumped snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct CacheDump {
    generation: u64,
    dumped_at: DateTime<Utc>,
    plugins: Vec<Plugin>,
}

/// [`PluginDao`] serving reads from a snapshot cache over a [`PluginStore`].
pub struct CachedPluginDao {
    store: Arc<dyn PluginStore>,
    snapshot: ArcSwap<Snapshot>,
    writer: Mutex<()>,
    options: CacheOptions,
}

impl CachedPluginDao {
    /// Create a DAO with an empty cache. Call `refresh_cache` or
    /// `load_cache_from_file` before serving reads.
    pub fn new(store: Arc<dyn PluginStore>, options: CacheOptions) -> Self {
        Self {
            store,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(()),
            options,
        }
    }

    /// Create a DAO and populate its cache.
    ///
    /// With `warm_start` enabled a readable dump is used as-is; otherwise, or
    /// when the dump is absent or unusable, the cache is refreshed from the store.
    pub async fn open(
        store: Arc<dyn PluginStore>,
        options: CacheOptions,
    ) -> Result<Self, FlowError> {
        let dao = Self::new(store, options);

        if dao.options.warm_start {
            match dao.load_cache_from_file().await {
                Ok(()) => return Ok(dao),
                Err(e) if e.is_not_found() => {
                    debug!(path = %dao.options.cache_file.display(), "no cache dump, loading from store");
                }
                Err(e) => {
                    warn!(error = %e, "cache dump unusable, loading from store");
                }
            }
        }

        dao.refresh_cache().await?;
        Ok(dao)
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// The current snapshot. Holding it does not block writers.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot.load().generation
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Replace the cache with the contents of the dump file.
    ///
    /// A missing file yields `NotFound`; an undecodable one `Serialization`.
    pub async fn load_cache_from_file(&self) -> Result<(), FlowError> {
        let path = &self.options.cache_file;
        let bytes = read_optional(path)
            .await?
            .ok_or_else(|| FlowError::NotFound {
                kind: "cache file",
                name: path.display().to_string(),
            })?;
        let dump: CacheDump = serde_json::from_slice(&bytes)
            .map_err(|e| FlowError::Serialization(format!("{}: {e}", path.display())))?;

        let plugins = dump
            .plugins
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        let _guard = self.writer.lock().await;
        let generation = self.swap(plugins);
        info!(
            path = %path.display(),
            generation,
            dumped_generation = dump.generation,
            dumped_at = %dump.dumped_at,
            "plugin cache warm-started from dump"
        );
        Ok(())
    }

    /// Publish a new snapshot built from `plugins`. Caller holds the writer lock.
    fn swap(&self, plugins: BTreeMap<String, Plugin>) -> u64 {
        let current = self.snapshot.load();
        let next = Snapshot::next(&current, plugins);
        let generation = next.generation;
        self.snapshot.store(Arc::new(next));
        generation
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, FlowError>
    where
        F: Future<Output = Result<T, FlowError>>,
    {
        let duration = self.options.store_timeout;
        match tokio::time::timeout(duration, fut).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(operation, timeout_ms = duration.as_millis() as u64, "plugin store timed out");
                Err(FlowError::Timeout { duration })
            }
        }
    }
}

#[async_trait]
impl PluginDao for CachedPluginDao {
    async fn list(&self, statuses: &[PluginStatus]) -> Result<Vec<Plugin>, FlowError> {
        Ok(self.snapshot.load().filtered(statuses))
    }

    async fn get(&self, name: &str) -> Result<Plugin, FlowError> {
        self.snapshot
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| FlowError::NotFound {
                kind: "plugin",
                name: name.to_string(),
            })
    }

    async fn update(&self, plugin: Plugin) -> Result<Plugin, FlowError> {
        let plugin = plugin.normalized()?;

        let _guard = self.writer.lock().await;
        let stored = self.bounded("save", self.store.save(plugin)).await?;

        let mut plugins = self.snapshot.load().plugins.clone();
        plugins.insert(stored.name.clone(), stored.clone());
        let generation = self.swap(plugins);
        debug!(plugin = %stored.name, status = %stored.status, generation, "plugin updated");
        Ok(stored)
    }

    async fn dump_cache_to_file(&self) -> Result<(), FlowError> {
        let snapshot = self.snapshot.load_full();
        let dump = CacheDump {
            generation: snapshot.generation,
            dumped_at: Utc::now(),
            plugins: snapshot.plugins.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&dump)
            .map_err(|e| FlowError::Serialization(format!("encoding plugin cache: {e}")))?;

        write_atomic(&self.options.cache_file, &bytes).await?;
        info!(
            path = %self.options.cache_file.display(),
            generation = snapshot.generation,
            plugins = snapshot.len(),
            "plugin cache dumped"
        );
        Ok(())
    }

    async fn refresh_cache(&self) -> Result<(), FlowError> {
        let _guard = self.writer.lock().await;
        let loaded = self.bounded("load_all", self.store.load_all()).await?;

        let plugins: BTreeMap<String, Plugin> =
            loaded.into_iter().map(|p| (p.name.clone(), p)).collect();
        let count = plugins.len();
        let generation = self.swap(plugins);
        info!(plugins = count, generation, "plugin cache refreshed");
        Ok(())
    }
}
