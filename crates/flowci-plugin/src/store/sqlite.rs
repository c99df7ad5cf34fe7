// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed plugin store.
//!
//! Holds a `tokio_rusqlite::Connection`; all statements run on its single
//! background thread, so saves are serialized by the connection itself.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flowci_core::{FlowError, PluginStatus};
use rusqlite::types::Type;
use tokio_rusqlite::Connection;

use super::PluginStore;
use crate::model::Plugin;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS plugins (
    name TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    source TEXT,
    tag TEXT,
    description TEXT,
    reason TEXT,
    updated_at TEXT
)";

pub struct SqlitePluginStore {
    conn: Connection,
}

impl SqlitePluginStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let conn = Connection::open(path.as_ref())
            .await
            .map_err(|e| FlowError::store("failed to open plugin database", e))?;
        Self::with_connection(conn).await
    }

    pub async fn open_in_memory() -> Result<Self, FlowError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| FlowError::store("failed to open in-memory plugin database", e))?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, FlowError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|e: tokio_rusqlite::Error<rusqlite::Error>| {
            FlowError::store("failed to create plugins table", e)
        })?;
        Ok(Self { conn })
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn row_to_plugin(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plugin> {
    let status: String = row.get(1)?;
    let status = PluginStatus::from_str(&status).map_err(|e| conversion_error(1, e))?;
    let updated_at: Option<String> = row.get(6)?;
    let updated_at = updated_at
        .map(|s| DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| conversion_error(6, e))?;

    Ok(Plugin {
        name: row.get(0)?,
        status,
        source: row.get(2)?,
        tag: row.get(3)?,
        description: row.get(4)?,
        reason: row.get(5)?,
        updated_at,
    })
}

#[async_trait]
impl PluginStore for SqlitePluginStore {
    async fn load_all(&self) -> Result<Vec<Plugin>, FlowError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name, status, source, tag, description, reason, updated_at \
                     FROM plugins ORDER BY name",
                )?;
                let plugins = stmt
                    .query_map([], row_to_plugin)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(plugins)
            })
            .await
            .map_err(|e: tokio_rusqlite::Error<rusqlite::Error>| {
                FlowError::store("failed to load plugins", e)
            })
    }

    async fn save(&self, mut plugin: Plugin) -> Result<Plugin, FlowError> {
        plugin.updated_at = Some(Utc::now());
        let row = plugin.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO plugins (name, status, source, tag, description, reason, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                     ON CONFLICT(name) DO UPDATE SET \
                       status = excluded.status, \
                       source = excluded.source, \
                       tag = excluded.tag, \
                       description = excluded.description, \
                       reason = excluded.reason, \
                       updated_at = excluded.updated_at",
                    rusqlite::params![
                        row.name,
                        row.status.to_string(),
                        row.source,
                        row.tag,
                        row.description,
                        row.reason,
                        row.updated_at.map(|t| t.to_rfc3339()),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|e: tokio_rusqlite::Error<rusqlite::Error>| {
                FlowError::store(format!("failed to save plugin '{}'", plugin.name), e)
            })?;

        Ok(plugin)
    }
}
