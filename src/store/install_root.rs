//! Explicit installation root for resolving relative target paths

use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Directory that relative `sourcePath` values are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoot {
    root: PathBuf,
}

impl InstallRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Install root from an existing directory, canonicalized.
    pub fn canonical(root: &Path) -> Result<Self, StorageError> {
        let root = dunce::canonicalize(root).map_err(|e| {
            StorageError::InvalidPath(format!(
                "Failed to canonicalize install root {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute paths are kept; relative ones are joined onto the root.
    pub fn resolve(&self, raw: impl AsRef<Path>) -> PathBuf {
        let raw = raw.as_ref();
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.root.join(raw)
        };
        normalize_path(dunce::simplified(&joined))
    }
}

/// Fold `.` and `..` components without touching the filesystem, so `out/a.json`,
/// `./out/a.json` and `out/x/../a.json` name the same target.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

impl Default for InstallRoot {
    fn default() -> Self {
        Self::new(".")
    }
}
