// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the flowci platform utilities.
//!
//! Provides the error taxonomy and the plugin status enumeration shared by
//! the resource resolver, the plugin registry and the CLI.

pub mod error;
pub mod types;

pub use error::FlowError;
pub use types::PluginStatus;
