// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bundled resources: entries compiled into the binary plus search roots.
//!
//! This is the classpath of the resolver. Lookups first consult embedded
//! entries, then each search root in order.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Where a bundled entry was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOrigin {
    /// Bytes compiled into the binary.
    Embedded(&'static [u8]),
    /// A readable file below one of the search roots.
    Root(PathBuf),
}

/// A set of named resources shipped with the application.
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    embedded: BTreeMap<String, &'static [u8]>,
    roots: Vec<PathBuf>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an embedded entry, typically from `include_bytes!`.
    pub fn with_embedded(mut self, name: &str, bytes: &'static [u8]) -> Self {
        self.embedded.insert(normalize_name(name), bytes);
        self
    }

    /// Append a search root. Roots are consulted in insertion order.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find a readable entry by name.
    ///
    /// Names are normalized by stripping a `classpath:` prefix and leading
    /// slashes. Names that escape a root via `..` never resolve.
    pub fn lookup(&self, name: &str) -> Option<BundleOrigin> {
        let name = normalize_name(name);
        if name.is_empty() {
            return None;
        }

        if let Some(bytes) = self.embedded.get(&name) {
            return Some(BundleOrigin::Embedded(*bytes));
        }

        let relative = Path::new(&name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| is_readable_file(candidate))
            .map(BundleOrigin::Root)
    }
}

fn normalize_name(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("classpath:").unwrap_or(name);
    name.trim_start_matches('/').to_string()
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
