//! Storage collaborators
//!
//! The merge engine never touches disk or the live tag system itself. Serialized documents
//! go through a [`TreeStore`]; snapshots, existence checks and imports go through a
//! [`TagStore`]. Relative target paths are resolved against an explicit [`InstallRoot`].

pub mod install_root;
pub mod persistence;
pub mod tag_store;

pub use install_root::{normalize_path, InstallRoot};
pub use persistence::FsTreeStore;
pub use tag_store::FileTagStore;

use crate::error::StorageError;
use crate::tree::{TagDocument, TagPath, TreeNode};
use crate::types::CollisionPolicy;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persistence of serialized tag documents.
pub trait TreeStore: Send + Sync {
    /// Read a document. `Ok(None)` when the file does not exist (or is blank).
    fn read(&self, path: &Path) -> Result<Option<TagDocument>, StorageError>;

    /// Write a document, creating parent directories as needed.
    fn write(&self, path: &Path, doc: &TagDocument) -> Result<(), StorageError>;

    /// Remove a document. Returns whether a file was removed.
    fn remove(&self, path: &Path) -> Result<bool, StorageError>;

    /// Every `.json` document under `dir`, sorted by path.
    fn list_documents(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError>;

    /// Remove `dir` if it exists and is empty.
    fn remove_dir_if_empty(&self, dir: &Path) -> Result<bool, StorageError>;

    /// Remove every document under `dir` along with directories left empty.
    fn clear(&self, dir: &Path) -> Result<usize, StorageError>;
}

/// Read an existing document for merging.
///
/// A missing file is empty; a malformed one is logged and also treated as empty so that a
/// fresh export can overwrite it.
pub fn load_or_empty(store: &dyn TreeStore, path: &Path) -> Result<TagDocument, StorageError> {
    match store.read(path) {
        Ok(doc) => Ok(doc.unwrap_or_default()),
        Err(StorageError::Malformed { path, reason }) => {
            warn!(
                path = %path.display(),
                reason = %reason,
                "Existing document is malformed, starting empty"
            );
            Ok(TagDocument::default())
        }
        Err(e) => Err(e),
    }
}

/// Counts reported by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub replaced: usize,
    pub merged: usize,
    pub skipped: usize,
    pub deleted: usize,
}

/// The live tag system, as far as export and import need it.
pub trait TagStore: Send + Sync {
    fn providers(&self) -> Result<Vec<String>, StorageError>;

    /// Materialized snapshot of the node at `path` (the provider root for the empty path).
    fn fetch(&self, provider: &str, path: &TagPath) -> Result<TreeNode, StorageError>;

    /// Whether anything already lives at `base`.
    fn tags_exist(&self, provider: &str, base: &TagPath) -> Result<bool, StorageError>;

    /// Import `nodes` as children of `base`, resolving same-named nodes by `policy`.
    fn import(
        &self,
        provider: &str,
        base: &TagPath,
        nodes: Vec<TreeNode>,
        policy: CollisionPolicy,
    ) -> Result<ImportSummary, StorageError>;

    /// Delete the node at `path`; the empty path clears the whole provider.
    fn delete(&self, provider: &str, path: &TagPath) -> Result<bool, StorageError>;
}
