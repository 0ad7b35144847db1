//! On-disk layouts
//!
//! Full (non-selective) export planning and read-back for each [`ExportMode`]. Planning is
//! pure: it turns a snapshot into the documents to write, and the export service persists
//! them through a [`TreeStore`].

pub mod individual;
pub mod single_file;
pub mod structured;

use crate::error::{StorageError, TreeError};
use crate::store::TreeStore;
use crate::tree::{TagDocument, TagPath, TreeNode};
use crate::types::{ExportMode, UDT_TYPES_FOLDER};
use std::path::{Path, PathBuf};

/// One document to write.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub document: TagDocument,
}

impl PlannedFile {
    pub fn new(path: PathBuf, document: TagDocument) -> Self {
        Self { path, document }
    }
}

/// Inputs for a full export of one target.
#[derive(Debug, Clone)]
pub struct ExportPlan<'a> {
    pub mode: ExportMode,
    /// Snapshot of the node at `base`
    pub snapshot: &'a TreeNode,
    pub base: &'a TagPath,
    /// Target file (`singleFile`) or directory
    pub output: &'a Path,
    pub exclude_udt_definitions: bool,
}

impl ExportPlan<'_> {
    /// Top-level nodes to export: a folder-like snapshot contributes its children.
    fn top_level(&self) -> Vec<TreeNode> {
        let mut nodes = if self.snapshot.kind.is_folder_like() {
            self.snapshot.children().to_vec()
        } else {
            vec![self.snapshot.clone()]
        };
        if self.exclude_udt_definitions && self.base.is_root() {
            nodes.retain(|n| n.name != UDT_TYPES_FOLDER);
        }
        nodes
    }

    pub fn plan(&self) -> Result<Vec<PlannedFile>, TreeError> {
        let nodes = self.top_level();
        match self.mode {
            ExportMode::SingleFile => {
                Ok(vec![single_file::plan(nodes, self.base, self.output)?])
            }
            ExportMode::IndividualFiles => Ok(individual::plan(&nodes, self.output)),
            ExportMode::StructuredByType => structured::plan(&nodes, self.output),
        }
    }
}

/// Read a target back into the node sequence it was exported from.
pub fn read_back(
    store: &dyn TreeStore,
    mode: ExportMode,
    output: &Path,
) -> Result<Vec<TreeNode>, StorageError> {
    match mode {
        ExportMode::SingleFile => single_file::read_back(store, output),
        ExportMode::IndividualFiles => individual::read_back(store, output),
        ExportMode::StructuredByType => structured::read_back(store, output),
    }
}

/// Remove previously written layout files for a target.
pub fn remove_existing(
    store: &dyn TreeStore,
    mode: ExportMode,
    output: &Path,
) -> Result<usize, StorageError> {
    match mode {
        ExportMode::SingleFile => Ok(usize::from(store.remove(output)?)),
        ExportMode::IndividualFiles | ExportMode::StructuredByType => store.clear(output),
    }
}

/// Clear a directory layout, leaving the top-level `_types_` directory alone when
/// `keep_types` is set.
pub fn clear_directory(
    store: &dyn TreeStore,
    dir: &Path,
    keep_types: bool,
) -> Result<usize, StorageError> {
    if !keep_types {
        return store.clear(dir);
    }
    let mut removed = 0;
    for file in store.list_documents(dir)? {
        if file.parent() == Some(dir) && store.remove(&file)? {
            removed += 1;
        }
    }
    for sub in subdirectories(dir) {
        if dir_name(&sub) != UDT_TYPES_FOLDER {
            removed += store.clear(&sub)?;
            store.remove_dir_if_empty(&sub)?;
        }
    }
    Ok(removed)
}

/// Immediate subdirectories of `dir`, sorted by name.
pub(crate) fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

/// Final path component as a tag name.
pub(crate) fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
