//! Consolidated layout: the whole target in one nested document.

use super::PlannedFile;
use crate::error::{StorageError, TreeError};
use crate::merge::normalize_root;
use crate::store::{load_or_empty, TreeStore};
use crate::tree::sorter::order_sequence;
use crate::tree::{TagDocument, TagPath, TreeNode};
use std::path::Path;

/// Build the consolidated document: UDT definitions ordered in every sibling sequence and
/// the root named after `base`.
pub fn plan(
    mut nodes: Vec<TreeNode>,
    base: &TagPath,
    output: &Path,
) -> Result<PlannedFile, TreeError> {
    order_sequence(&mut nodes)?;
    let mut document = TagDocument::with_tags(nodes);
    normalize_root(&mut document, base);
    Ok(PlannedFile::new(output.to_path_buf(), document))
}

pub fn read_back(store: &dyn TreeStore, output: &Path) -> Result<Vec<TreeNode>, StorageError> {
    Ok(load_or_empty(store, output)?.tags.unwrap_or_default())
}
