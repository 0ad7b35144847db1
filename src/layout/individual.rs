//! Per-item layout: one directory per folder, one `<name>.json` per other node.

use super::{dir_name, subdirectories, PlannedFile};
use crate::error::StorageError;
use crate::store::{load_or_empty, TreeStore};
use crate::tree::sorter::order_sequence;
use crate::tree::{TagDocument, TagKind, TreeNode};
use crate::types::UDT_TYPES_FOLDER;
use std::path::Path;
use tracing::warn;

pub fn plan(nodes: &[TreeNode], dir: &Path) -> Vec<PlannedFile> {
    let mut planned = Vec::new();
    plan_into(nodes, dir, &mut planned);
    planned
}

fn plan_into(nodes: &[TreeNode], dir: &Path, planned: &mut Vec<PlannedFile>) {
    for node in nodes {
        match node.kind {
            TagKind::Folder => plan_into(node.children(), &dir.join(&node.name), planned),
            TagKind::Provider => plan_into(node.children(), dir, planned),
            _ => planned.push(PlannedFile::new(
                item_file(dir, &node.name),
                TagDocument::from(node.clone()),
            )),
        }
    }
}

/// File holding a single item in `dir`.
pub fn item_file(dir: &Path, name: &str) -> std::path::PathBuf {
    dir.join(format!("{}.json", name))
}

/// Rebuild the node sequence: item files first (by file name), then one folder per
/// subdirectory. Definitions under `_types_` are put back in dependency order.
pub fn read_back(store: &dyn TreeStore, dir: &Path) -> Result<Vec<TreeNode>, StorageError> {
    let mut nodes = Vec::new();

    for file in store.list_documents(dir)? {
        if file.parent() != Some(dir) {
            continue;
        }
        let doc = load_or_empty(store, &file)?;
        if doc.is_empty() {
            continue;
        }
        nodes.push(doc.into_node());
    }

    for sub in subdirectories(dir) {
        let name = dir_name(&sub);
        let mut children = read_back(store, &sub)?;
        if name == UDT_TYPES_FOLDER {
            if let Err(e) = order_sequence(&mut children) {
                warn!(dir = %sub.display(), error = %e, "Leaving UDT definitions unordered");
            }
        }
        nodes.push(TreeNode::folder(name).with_children(children));
    }

    Ok(nodes)
}
