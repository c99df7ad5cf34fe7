// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the flowci crates.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the resource resolver and plugin registry.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A named record or resource does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The caller passed a malformed value (e.g. a plugin without a name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem I/O failure.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// Backing store failure (database, remote service).
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A persisted document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Every configured resource source was probed and none resolved.
    #[error("no configuration resource available (tried: {sources})")]
    ConfigurationAbsent { sources: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Shorthand for an I/O error with a description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        FlowError::Io {
            context: context.into(),
            source,
        }
    }

    /// Shorthand for a store error wrapping an underlying cause.
    pub fn store<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FlowError::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the caller may retry the failed operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::Io { .. } | FlowError::Store { .. } | FlowError::Timeout { .. }
        )
    }

    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FlowError::NotFound { .. })
    }
}
