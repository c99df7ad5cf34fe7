// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `flowci plugin` command implementation.
//!
//! Each invocation opens the configured store, populates the cache (warm
//! start from the dump when enabled), runs one DAO operation and exits.
//! Writes (`update`, `refresh`) dump the cache afterwards so the next
//! invocation warm-starts from current state.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use flowci_config::{PluginConfig, StoreKind};
use flowci_core::{FlowError, PluginStatus};
use flowci_plugin::{
    CacheOptions, CachedPluginDao, JsonFilePluginStore, MemoryPluginStore, Plugin, PluginDao,
    PluginStore, SqlitePluginStore,
};
use tracing::info;

/// Plugin registry subcommands.
#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// List plugins, optionally filtered by status.
    List {
        /// Keep only plugins in this status (repeatable).
        #[arg(long, value_name = "STATUS")]
        status: Vec<PluginStatus>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one plugin as JSON.
    Get {
        name: String,
    },
    /// Create or replace a plugin record.
    Update {
        name: String,
        #[arg(long)]
        status: PluginStatus,
        #[arg(long, value_name = "URL")]
        source: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Write the cache to the configured dump file.
    Dump,
    /// Reload the cache from the backing store.
    Refresh,
}

/// Open the configured backing store.
pub async fn open_store(config: &PluginConfig) -> Result<Arc<dyn PluginStore>, FlowError> {
    let store: Arc<dyn PluginStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryPluginStore::new()),
        StoreKind::Json => Arc::new(JsonFilePluginStore::new(&config.store_path)),
        StoreKind::Sqlite => Arc::new(SqlitePluginStore::open(&config.store_path).await?),
    };
    Ok(store)
}

pub fn cache_options(config: &PluginConfig) -> CacheOptions {
    CacheOptions {
        cache_file: PathBuf::from(&config.cache_file),
        store_timeout: config.store_timeout(),
        warm_start: config.warm_start,
    }
}

/// Run a `flowci plugin` subcommand.
pub async fn run_plugin(
    config: &PluginConfig,
    command: PluginCommand,
    out: &mut impl Write,
) -> Result<(), FlowError> {
    let store = open_store(config).await?;
    let dao = CachedPluginDao::open(store, cache_options(config)).await?;
    execute(&dao, command, out).await
}

async fn execute(
    dao: &CachedPluginDao,
    command: PluginCommand,
    out: &mut impl Write,
) -> Result<(), FlowError> {
    match command {
        PluginCommand::List { status, json } => {
            let plugins = dao.list(&status).await?;
            if json {
                write_json(out, &plugins)?;
            } else {
                for plugin in &plugins {
                    write_row(out, plugin)?;
                }
            }
        }
        PluginCommand::Get { name } => {
            let plugin = dao.get(&name).await?;
            write_json(out, &plugin)?;
        }
        PluginCommand::Update {
            name,
            status,
            source,
            tag,
            description,
        } => {
            let mut plugin = Plugin::new(name, status);
            plugin.source = source;
            plugin.tag = tag;
            plugin.description = description;

            let stored = dao.update(plugin).await?;
            dao.dump_cache_to_file().await?;
            write_row(out, &stored)?;
        }
        PluginCommand::Dump => {
            dao.dump_cache_to_file().await?;
            writeln!(out, "{}", dao.options().cache_file.display()).map_err(output_error)?;
        }
        PluginCommand::Refresh => {
            dao.refresh_cache().await?;
            dao.dump_cache_to_file().await?;
            info!(plugins = dao.len(), generation = dao.generation(), "refresh complete");
            writeln!(out, "{} plugins", dao.len()).map_err(output_error)?;
        }
    }
    Ok(())
}

fn write_row(out: &mut impl Write, plugin: &Plugin) -> Result<(), FlowError> {
    writeln!(
        out,
        "{}\t{}\t{}",
        plugin.name,
        plugin.status,
        plugin.tag.as_deref().unwrap_or("-")
    )
    .map_err(output_error)
}

fn write_json<T: serde::Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), FlowError> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|e| FlowError::Serialization(e.to_string()))?;
    writeln!(out).map_err(output_error)
}

fn output_error(e: std::io::Error) -> FlowError {
    FlowError::io("writing output", e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_config(dir: &std::path::Path) -> PluginConfig {
        PluginConfig {
            store: StoreKind::Json,
            store_path: dir.join("plugins.json").display().to_string(),
            cache_file: dir.join("plugin-cache.json").display().to_string(),
            ..PluginConfig::default()
        }
    }

    async fn run(config: &PluginConfig, command: PluginCommand) -> Result<String, FlowError> {
        let mut out = Vec::new();
        run_plugin(config, command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn update(name: &str, status: PluginStatus) -> PluginCommand {
        PluginCommand::Update {
            name: name.to_string(),
            status,
            source: None,
            tag: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn update_then_get_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_config(dir.path());

        let printed = run(&config, update("docker-plugin", PluginStatus::Pending))
            .await
            .unwrap();
        assert_eq!(printed, "docker-plugin\tPENDING\t-\n");

        let printed = run(
            &config,
            PluginCommand::Get {
                name: "docker-plugin".into(),
            },
        )
        .await
        .unwrap();
        let plugin: Plugin = serde_json::from_str(&printed).unwrap();
        assert_eq!(plugin.status, PluginStatus::Pending);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_config(dir.path());
        run(&config, update("docker-plugin", PluginStatus::Pending))
            .await
            .unwrap();
        run(&config, update("fir-plugin", PluginStatus::Installed))
            .await
            .unwrap();

        let printed = run(
            &config,
            PluginCommand::List {
                status: vec![PluginStatus::Installed],
                json: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(printed, "fir-plugin\tINSTALLED\t-\n");
    }

    #[tokio::test]
    async fn get_unknown_plugin_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            &json_config(dir.path()),
            PluginCommand::Get {
                name: "missing".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn refresh_picks_up_external_store_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_config(dir.path());
        run(&config, update("docker-plugin", PluginStatus::Pending))
            .await
            .unwrap();

        // Another writer changes the store behind the dump.
        let store = JsonFilePluginStore::new(&config.store_path);
        store
            .save(Plugin::new("docker-plugin", PluginStatus::Installed))
            .await
            .unwrap();

        let get = || PluginCommand::Get {
            name: "docker-plugin".into(),
        };
        let stale: Plugin = serde_json::from_str(&run(&config, get()).await.unwrap()).unwrap();
        assert_eq!(stale.status, PluginStatus::Pending);

        assert_eq!(run(&config, PluginCommand::Refresh).await.unwrap(), "1 plugins\n");
        let fresh: Plugin = serde_json::from_str(&run(&config, get()).await.unwrap()).unwrap();
        assert_eq!(fresh.status, PluginStatus::Installed);
    }

    #[tokio::test]
    async fn blank_name_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&json_config(dir.path()), update("  ", PluginStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn dump_prints_cache_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_config(dir.path());
        let printed = run(&config, PluginCommand::Dump).await.unwrap();
        assert_eq!(printed.trim_end(), config.cache_file);
        assert!(std::path::Path::new(&config.cache_file).exists());
    }
}
