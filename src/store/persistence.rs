//! Filesystem persistence for serialized tag documents

use crate::error::StorageError;
use crate::store::TreeStore;
use crate::tree::TagDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Pretty-printed JSON documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTreeStore;

impl FsTreeStore {
    pub fn new() -> Self {
        Self
    }
}

impl TreeStore for FsTreeStore {
    fn read(&self, path: &Path) -> Result<Option<TagDocument>, StorageError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    #[instrument(skip(self, doc), fields(path = %path.display()))]
    fn write(&self, path: &Path, doc: &TagDocument) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc).map_err(|e| StorageError::Malformed {
            path: path.to_path_buf(),
            reason: format!("Failed to serialize document: {}", e),
        })?;
        fs::write(path, json)?;
        debug!("Wrote tag document");
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<bool, StorageError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn list_documents(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut documents = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    ErrorKind::Other,
                    format!("Failed to walk directory: {}", e),
                ))
            })?;
            let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
            if entry.file_type().is_file() && is_json {
                documents.push(entry.into_path());
            }
        }
        Ok(documents)
    }

    fn remove_dir_if_empty(&self, dir: &Path) -> Result<bool, StorageError> {
        let mut entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(StorageError::IoError(e)),
        };
        if entries.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(dir)?;
        Ok(true)
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn clear(&self, dir: &Path) -> Result<usize, StorageError> {
        let documents = self.list_documents(dir)?;
        for doc in &documents {
            self.remove(doc)?;
        }

        // Deepest directories first so parents empty out before they are checked.
        let mut dirs: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect();
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for d in dirs {
            self.remove_dir_if_empty(&d)?;
        }

        debug!(removed = documents.len(), "Cleared tag documents");
        Ok(documents.len())
    }
}
