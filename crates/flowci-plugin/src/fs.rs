// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File helpers shared by the JSON store and the cache dump.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use flowci_core::FlowError;

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// Readers of `path` see either the old content or the new content.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FlowError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FlowError::io(format!("creating {}", parent.display()), e))?;
    }

    let tmp = TempFile::new(tmp_path(path));
    tokio::fs::write(&tmp.path, bytes)
        .await
        .map_err(|e| FlowError::io(format!("writing {}", tmp.path.display()), e))?;
    tokio::fs::rename(&tmp.path, path)
        .await
        .map_err(|e| FlowError::io(format!("renaming into {}", path.display()), e))?;
    tmp.persist();
    Ok(())
}

/// Removes the temp file on drop unless it was renamed into place.
///
/// Also covers a write future dropped mid-way by a timeout.
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn persist(mut self) {
        self.persisted = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Read a file, mapping a missing file to `Ok(None)`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, FlowError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FlowError::io(format!("reading {}", path.display()), e)),
    }
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique per call so concurrent writers never share a temp file.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("flowci"));
    let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_is_a_unique_sibling() {
        let path = Path::new("/var/lib/flowci/cache.json");
        let a = tmp_path(path);
        let b = tmp_path(path);
        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cache.json.") && name.ends_with(".tmp"), "{name}");
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");

        write_atomic(&path, b"one").await.unwrap();
        write_atomic(&path, b"two").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"two");
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target makes the rename fail.
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let err = write_atomic(&path, b"data").await.unwrap_err();
        assert!(matches!(err, FlowError::Io { .. }));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("cache.json")]);
    }

    #[tokio::test]
    async fn read_optional_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("missing.json"))
            .await
            .unwrap()
            .is_none());
    }
}
