// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin record as held by the backing store and the cache.

use chrono::{DateTime, Utc};
use flowci_core::{FlowError, PluginStatus};
use serde::{Deserialize, Serialize};

/// A plugin record. `name` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Unique plugin name (e.g. "docker-plugin").
    pub name: String,
    /// Current lifecycle status.
    pub status: PluginStatus,
    /// Where the plugin is fetched from, usually a git URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Version tag to install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reason for the last failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stamped by the backing store on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, status: PluginStatus) -> Self {
        Self {
            name: name.into(),
            status,
            source: None,
            tag: None,
            description: None,
            reason: None,
            updated_at: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Trim the name and check that a primary key is present.
    pub fn normalized(mut self) -> Result<Self, FlowError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(FlowError::InvalidArgument(
                "plugin name must not be empty".to_string(),
            ));
        }
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_name() {
        let plugin = Plugin::new("  docker-plugin ", PluginStatus::Pending)
            .normalized()
            .unwrap();
        assert_eq!(plugin.name, "docker-plugin");
    }

    #[test]
    fn normalized_rejects_blank_name() {
        let err = Plugin::new("   ", PluginStatus::Pending)
            .normalized()
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidArgument(_)));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&Plugin::new("fir", PluginStatus::Installed)).unwrap();
        assert_eq!(json, r#"{"name":"fir","status":"INSTALLED"}"#);

        let back: Plugin = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "fir");
        assert!(back.source.is_none());
    }
}
