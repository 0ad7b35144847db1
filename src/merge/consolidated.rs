//! Consolidated layout: one nested document per output target.

use super::normalize::normalize_root;
use super::ExportPathSpec;
use crate::error::TreeError;
use crate::tree::builder::{Replacement, StructureBuilder};
use crate::tree::node::{same_name, TreeNode};
use crate::tree::path::TagPath;
use crate::tree::resolver::{node_at_mut, parent_level_mut, resolve, Resolution};
use crate::tree::TagDocument;
use crate::types::TargetMatch;
use tracing::debug;

/// Merge `replacement` into a consolidated document.
///
/// The whole tag list is swapped when the selection is the provider root, when the file is
/// fresh and the selection is the base, or when the document root is itself the selected
/// node. Otherwise the selection is resolved relative to the document root: a found
/// container has its children replaced, a found item is replaced in place, and a missing
/// path is built by [`StructureBuilder`]. The root is always normalized from `spec.base`.
pub fn merge_consolidated(
    existing: &TagDocument,
    replacement: &Replacement,
    spec: &ExportPathSpec,
) -> Result<TagDocument, TreeError> {
    let mut merged = existing.clone();

    if spec.selected.is_root()
        || (existing.is_empty() && spec.selected == spec.base)
        || root_is_target(existing, spec)
    {
        debug!("Replacing document root content");
        merged.tags = Some(replacement.nodes.clone());
    } else {
        let search = search_path(existing, spec);
        debug!(search = %search, "Resolving selection inside document");
        splice(merged.tags_mut(), &search, replacement)?;
    }

    normalize_root(&mut merged, &spec.base);
    Ok(merged)
}

fn root_is_target(existing: &TagDocument, spec: &ExportPathSpec) -> bool {
    match spec.target_match {
        TargetMatch::FullPath => spec.selected == spec.base,
        TargetMatch::LastSegment => {
            match (existing.name.as_deref(), spec.selected.last()) {
                (Some(name), Some(last)) => same_name(name, last),
                _ => false,
            }
        }
    }
}

/// Path of the selection relative to the document root.
pub fn search_path(existing: &TagDocument, spec: &ExportPathSpec) -> TagPath {
    if spec.target_match == TargetMatch::FullPath {
        if let Some(relative) = spec.selected.strip_prefix(&spec.base) {
            return relative;
        }
    }
    by_root_name(existing, &spec.selected, &spec.base)
}

/// Locate the document root's own name inside the selection and keep what follows it.
fn by_root_name(existing: &TagDocument, selected: &TagPath, base: &TagPath) -> TagPath {
    let segments = selected.segments();

    if let Some(name) = existing.name.as_deref().filter(|n| !n.is_empty()) {
        let interior =
            (1..segments.len().saturating_sub(1)).find(|&i| same_name(&segments[i], name));
        if let Some(i) = interior {
            return selected.skip(i + 1);
        }
        if segments.len() > 1 && same_name(&segments[0], name) {
            return selected.skip(1);
        }
        return selected.clone();
    }

    if existing.is_empty() && !base.is_root() && segments.len() > 1 {
        return selected.skip(1);
    }
    selected.clone()
}

fn splice(
    level: &mut Vec<TreeNode>,
    path: &TagPath,
    replacement: &Replacement,
) -> Result<(), TreeError> {
    if path.is_root() {
        *level = replacement.nodes.clone();
        return Ok(());
    }

    match resolve(level, path) {
        Resolution::Found { indices, container } if replacement.container => {
            if let Some(node) = node_at_mut(level, &indices) {
                if container {
                    node.replace_children(replacement.nodes.clone());
                } else {
                    *node = TreeNode::folder(node.name.clone())
                        .with_children(replacement.nodes.clone());
                }
            }
        }
        Resolution::Found { indices, .. } => {
            if let Some((parent, index)) = parent_level_mut(level, &indices) {
                replace_at(parent, index, &replacement.nodes);
            }
        }
        Resolution::Missing { .. } => {
            StructureBuilder::new(path).place(level, replacement)?;
        }
    }
    Ok(())
}

/// Swap the node at `index` for `nodes`, dropping any other sibling that shares a name with
/// an incoming node so names stay unique.
fn replace_at(level: &mut Vec<TreeNode>, index: usize, nodes: &[TreeNode]) {
    level.remove(index);
    let mut insert_at = index;
    let mut position = 0;
    level.retain(|sibling| {
        let keep = !nodes.iter().any(|n| same_name(&n.name, &sibling.name));
        if !keep && position < index {
            insert_at -= 1;
        }
        position += 1;
        keep
    });
    level.splice(insert_at..insert_at, nodes.iter().cloned());
}
