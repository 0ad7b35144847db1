//! Per-item layout: path arithmetic mapping a selection onto the target's directory tree.

use crate::tree::builder::Replacement;
use crate::tree::node::TagKind;
use crate::tree::{TagDocument, TagPath};
use std::path::{Path, PathBuf};

/// The part of `selected` below `base`, or `selected` itself when it is not under `base`.
pub fn relative_target(selected: &TagPath, base: &TagPath) -> TagPath {
    selected
        .strip_prefix(base)
        .unwrap_or_else(|| selected.clone())
}

/// Directory under `source` that mirrors `selected` relative to `base`.
pub fn target_location(source: &Path, selected: &TagPath, base: &TagPath) -> PathBuf {
    relative_target(selected, base)
        .segments()
        .iter()
        .fold(source.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Inverse of [`target_location`]: strip the mirrored segments back off `location` to get
/// the target's output root.
pub fn target_root(location: &Path, selected: &TagPath, base: &TagPath) -> PathBuf {
    let mut root = location.to_path_buf();
    for segment in relative_target(selected, base).segments().iter().rev() {
        if root.file_name().map_or(true, |name| name != segment.as_str()) {
            break;
        }
        root.pop();
    }
    root
}

/// Directory that receives a single exported item: when the mirrored directory already ends
/// with the item's name, the item belongs in the parent directory.
pub fn single_item_dir(location: &Path, item_name: &str) -> PathBuf {
    match (location.file_name(), location.parent()) {
        (Some(last), Some(parent)) if last == item_name => parent.to_path_buf(),
        _ => location.to_path_buf(),
    }
}

/// Per-item documents are the node itself; container content becomes a folder document
/// named after the selection.
pub fn document_for(replacement: &Replacement, selected: &TagPath) -> TagDocument {
    match replacement.nodes.as_slice() {
        [node] if !replacement.container => TagDocument::from(node.clone()),
        nodes => {
            let mut doc = TagDocument::with_tags(nodes.to_vec());
            match selected.last() {
                Some(name) => {
                    doc.name = Some(name.to_string());
                    doc.kind = Some(TagKind::Folder);
                }
                None => {
                    doc.name = Some(String::new());
                    doc.kind = Some(TagKind::Provider);
                }
            }
            doc
        }
    }
}
