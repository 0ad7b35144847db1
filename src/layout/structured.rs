//! Type-separated directory layout: per folder directory a `tags.json` with atomic tags and
//! a `udts.json` with UDT instances and definitions.

use super::{dir_name, subdirectories, PlannedFile};
use crate::error::{StorageError, TreeError};
use crate::store::{load_or_empty, TreeStore};
use crate::tree::sorter::order_sequence;
use crate::tree::{TagDocument, TagKind, TreeNode};
use crate::types::{TAGS_FILE, UDTS_FILE, UDT_TYPES_FOLDER};
use std::path::Path;

pub fn plan(nodes: &[TreeNode], dir: &Path) -> Result<Vec<PlannedFile>, TreeError> {
    let mut planned = Vec::new();
    plan_into(nodes, dir, &mut planned)?;
    Ok(planned)
}

fn plan_into(
    nodes: &[TreeNode],
    dir: &Path,
    planned: &mut Vec<PlannedFile>,
) -> Result<(), TreeError> {
    let mut tags = Vec::new();
    let mut udts = Vec::new();
    let mut folders = Vec::new();

    for node in nodes {
        match node.kind {
            TagKind::AtomicTag => tags.push(node.clone()),
            TagKind::UdtInstance | TagKind::UdtDefinition => udts.push(node.clone()),
            TagKind::Folder | TagKind::Provider => folders.push(node),
        }
    }

    if !tags.is_empty() {
        planned.push(PlannedFile::new(dir.join(TAGS_FILE), TagDocument::with_tags(tags)));
    }
    if !udts.is_empty() {
        order_sequence(&mut udts)?;
        planned.push(PlannedFile::new(dir.join(UDTS_FILE), TagDocument::with_tags(udts)));
    }

    for folder in folders {
        let sub = if folder.kind == TagKind::Provider {
            dir.to_path_buf()
        } else {
            dir.join(&folder.name)
        };
        plan_into(folder.children(), &sub, planned)?;
    }
    Ok(())
}

/// Stream file a node belongs to inside its folder directory.
pub fn stream_file(kind: TagKind) -> &'static str {
    if kind.is_udt() {
        UDTS_FILE
    } else {
        TAGS_FILE
    }
}

/// Rebuild a folder's children: `tags.json` entries, then `udts.json` entries, then one
/// folder per subdirectory with `_types_` first.
pub fn read_back(store: &dyn TreeStore, dir: &Path) -> Result<Vec<TreeNode>, StorageError> {
    let mut nodes = Vec::new();
    nodes.extend(load_or_empty(store, &dir.join(TAGS_FILE))?.tags.unwrap_or_default());
    nodes.extend(load_or_empty(store, &dir.join(UDTS_FILE))?.tags.unwrap_or_default());

    let mut subdirs = subdirectories(dir);
    subdirs.sort_by_key(|sub| dir_name(sub) != UDT_TYPES_FOLDER);
    for sub in subdirs {
        let children = read_back(store, &sub)?;
        nodes.push(TreeNode::folder(dir_name(&sub)).with_children(children));
    }
    Ok(nodes)
}
