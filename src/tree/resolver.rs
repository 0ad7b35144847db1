//! Path resolution: map a tag path to an index path inside a sibling sequence.
//!
//! Resolution never fails. A path that runs out of matching siblings reports the matched
//! prefix and the first unmatched segment; callers decide whether that warrants building
//! folders or is fatal.

use crate::tree::node::{find_by_name, TreeNode};
use crate::tree::path::TagPath;

/// Outcome of resolving a path against a sibling sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every segment matched. `indices` is empty for the root itself.
    Found {
        indices: Vec<usize>,
        /// The matched node is folder-like, so a merge replaces its children.
        container: bool,
    },
    /// Resolution stopped at `unmatched` (index into the path's segments).
    Missing { matched: Vec<usize>, unmatched: usize },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }
}

/// Walk `path` level by level through `children`, matching by exact name.
///
/// Descends through any matched node that has children; a matched leaf with segments still
/// remaining stops resolution at the next segment.
pub fn resolve(children: &[TreeNode], path: &TagPath) -> Resolution {
    let mut level = children;
    let mut indices = Vec::with_capacity(path.len());
    let mut container = true;

    for (depth, segment) in path.segments().iter().enumerate() {
        match find_by_name(level, segment) {
            Some(i) => {
                let node = &level[i];
                indices.push(i);
                container = node.kind.is_folder_like();
                level = node.children();
            }
            None => {
                return Resolution::Missing {
                    matched: indices,
                    unmatched: depth,
                }
            }
        }
    }

    Resolution::Found { indices, container }
}

/// Node at an index path; `None` for the empty index path or a stale index.
pub fn node_at<'a>(children: &'a [TreeNode], indices: &[usize]) -> Option<&'a TreeNode> {
    let (last, parents) = indices.split_last()?;
    let mut level = children;
    for &i in parents {
        level = level.get(i)?.children();
    }
    level.get(*last)
}

pub fn node_at_mut<'a>(
    children: &'a mut Vec<TreeNode>,
    indices: &[usize],
) -> Option<&'a mut TreeNode> {
    let (last, parents) = indices.split_last()?;
    let mut level = children;
    for &i in parents {
        level = level.get_mut(i)?.children.as_mut()?;
    }
    level.get_mut(*last)
}

/// Sibling sequence that holds the node at `indices`, plus that node's position in it.
pub fn parent_level_mut<'a>(
    children: &'a mut Vec<TreeNode>,
    indices: &[usize],
) -> Option<(&'a mut Vec<TreeNode>, usize)> {
    let (last, parents) = indices.split_last()?;
    let mut level = children;
    for &i in parents {
        level = level.get_mut(i)?.children.as_mut()?;
    }
    if *last < level.len() {
        Some((level, *last))
    } else {
        None
    }
}

/// Convenience lookup of the node at `path` under `root`.
pub fn locate<'a>(root: &'a TreeNode, path: &TagPath) -> Option<&'a TreeNode> {
    if path.is_root() {
        return Some(root);
    }
    match resolve(root.children(), path) {
        Resolution::Found { indices, .. } => node_at(root.children(), &indices),
        Resolution::Missing { .. } => None,
    }
}
