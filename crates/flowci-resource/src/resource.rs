// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A resolved, loadable configuration resource.

use std::path::{Path, PathBuf};

use flowci_core::FlowError;

use crate::bundle::BundleOrigin;
use crate::config::ResourceSource;

/// A resource backed either by the filesystem or by the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Found through the environment, a property or the default path.
    File { path: PathBuf, source: ResourceSource },
    /// Found in the bundle under `name`.
    Classpath {
        name: String,
        origin: BundleOrigin,
        source: ResourceSource,
    },
}

impl Resource {
    /// Which of the five sources produced this resource.
    pub fn source(&self) -> ResourceSource {
        match self {
            Resource::File { source, .. } | Resource::Classpath { source, .. } => *source,
        }
    }

    /// Filesystem path backing this resource, if there is one.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Resource::File { path, .. } => Some(path),
            Resource::Classpath {
                origin: BundleOrigin::Root(path),
                ..
            } => Some(path),
            Resource::Classpath {
                origin: BundleOrigin::Embedded(_),
                ..
            } => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Resource::File { .. })
    }

    /// Human-readable location, e.g. `/etc/app/cfg.toml` or `classpath:app.toml (embedded)`.
    pub fn location(&self) -> String {
        match self {
            Resource::File { path, .. } => path.display().to_string(),
            Resource::Classpath {
                name,
                origin: BundleOrigin::Embedded(_),
                ..
            } => format!("classpath:{name} (embedded)"),
            Resource::Classpath {
                name,
                origin: BundleOrigin::Root(path),
                ..
            } => format!("classpath:{name} ({})", path.display()),
        }
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, FlowError> {
        match self {
            Resource::Classpath {
                origin: BundleOrigin::Embedded(bytes),
                ..
            } => Ok(bytes.to_vec()),
            _ => {
                // file_path() is Some for every non-embedded variant
                let path = self.file_path().ok_or_else(|| {
                    FlowError::Internal("resource has no backing path".to_string())
                })?;
                std::fs::read(path)
                    .map_err(|e| FlowError::io(format!("reading {}", path.display()), e))
            }
        }
    }

    pub fn read_to_string(&self) -> Result<String, FlowError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|e| {
            FlowError::Serialization(format!("{} is not valid UTF-8: {e}", self.location()))
        })
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.location(), self.source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::parallel;

    #[test]
    #[parallel]
    fn embedded_resource_reads_bytes() {
        let res = Resource::Classpath {
            name: "app.toml".into(),
            origin: BundleOrigin::Embedded(b"x = 1"),
            source: ResourceSource::ClasspathDefault,
        };
        assert_eq!(res.read_to_string().unwrap(), "x = 1");
        assert!(res.file_path().is_none());
        assert_eq!(res.location(), "classpath:app.toml (embedded)");
        assert_eq!(res.to_string(), "classpath:app.toml (embedded) [default]");
    }

    #[test]
    #[parallel]
    fn file_resource_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.properties");
        std::fs::write(&path, "a=b").unwrap();
        let res = Resource::File {
            path: path.clone(),
            source: ResourceSource::EnvVar,
        };
        assert!(res.is_file());
        assert_eq!(res.file_path(), Some(path.as_path()));
        assert_eq!(res.read_to_string().unwrap(), "a=b");
    }

    #[test]
    #[parallel]
    fn missing_file_is_io_error() {
        let res = Resource::File {
            path: PathBuf::from("/nonexistent/flowci/cfg.toml"),
            source: ResourceSource::DefaultDirectory,
        };
        let err = res.read_bytes().unwrap_err();
        assert!(matches!(err, FlowError::Io { .. }));
    }

    #[test]
    #[parallel]
    fn invalid_utf8_is_serialization_error() {
        let res = Resource::Classpath {
            name: "bin".into(),
            origin: BundleOrigin::Embedded(&[0xff, 0xfe]),
            source: ResourceSource::ClasspathEntry,
        };
        assert!(matches!(
            res.read_to_string().unwrap_err(),
            FlowError::Serialization(_)
        ));
    }
}
