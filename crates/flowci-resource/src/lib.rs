// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration resource resolution.
//!
//! A [`ResourceConfig`] names up to five sources. [`resolve`] tries them in
//! fixed priority order and returns the first one that exists:
//!
//! 1. environment variable holding a path
//! 2. system property holding a path
//! 3. a literal default path
//! 4. a bundled entry
//! 5. a built-in bundled default
//!
//! ```no_run
//! use flowci_resource::{ResourceBundle, ResourceConfig, ResourceResolver};
//!
//! let resolver = ResourceResolver::new(
//!     ResourceConfig::default()
//!         .with_env_name("APP_CONFIG")
//!         .with_default("app-default.toml"),
//! )
//! .with_bundle(ResourceBundle::new().with_embedded("app-default.toml", b"# defaults"));
//!
//! if let Some(resource) = resolver.resolve() {
//!     println!("using {}", resource.location());
//! }
//! ```

pub mod bundle;
pub mod config;
pub mod properties;
pub mod resolver;
pub mod resource;

pub use bundle::{BundleOrigin, ResourceBundle};
pub use config::{ResourceConfig, ResourceSource};
pub use properties::SystemProperties;
pub use resolver::{resolve, ResourceResolver};
pub use resource::Resource;
