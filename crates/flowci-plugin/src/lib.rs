// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry access.
//!
//! [`PluginDao`] is the data-access contract. [`CachedPluginDao`] implements it
//! with a copy-on-write snapshot cache over an injected [`PluginStore`]; the
//! cache can be dumped to a JSON file and warm-started from it.

pub mod cache;
pub mod dao;
mod fs;
pub mod model;
pub mod store;

pub use cache::{CacheOptions, CachedPluginDao, Snapshot, DEFAULT_STORE_TIMEOUT};
pub use dao::PluginDao;
pub use model::Plugin;
pub use store::{JsonFilePluginStore, MemoryPluginStore, PluginStore, SqlitePluginStore};
