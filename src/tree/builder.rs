//! Structure builder: create missing folders along a path and place content at its end.

use crate::error::TreeError;
use crate::tree::node::{find_by_name, TagKind, TreeNode};
use crate::tree::path::TagPath;
use tracing::{debug, instrument};

/// Freshly computed content for one selected path.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// Nodes to place. For a container these are the container's children.
    pub nodes: Vec<TreeNode>,
    /// The selected path names a folder whose children are `nodes`; otherwise `nodes` is
    /// the selected item itself.
    pub container: bool,
}

impl Replacement {
    /// Shape a fetched snapshot: a single atomic tag or UDT is placed as itself, while a
    /// folder or provider contributes its children.
    pub fn from_snapshot(snapshot: TreeNode) -> Self {
        if snapshot.kind.is_folder_like() {
            Self {
                nodes: snapshot.children.unwrap_or_default(),
                container: true,
            }
        } else {
            Self {
                nodes: vec![snapshot],
                container: false,
            }
        }
    }

    pub fn container(nodes: Vec<TreeNode>) -> Self {
        Self {
            nodes,
            container: true,
        }
    }

    pub fn single(node: TreeNode) -> Self {
        Self {
            nodes: vec![node],
            container: false,
        }
    }

    /// The final path segment is materialized as a folder when the content is a container
    /// or carries more than one node.
    pub fn final_is_folder(&self) -> bool {
        self.container || self.nodes.len() > 1
    }
}

/// What a placement changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceReport {
    pub created_folders: usize,
    pub replaced: usize,
    pub added: usize,
}

/// Places replacement content at a path inside a sibling sequence, creating folders for
/// every segment that does not exist yet.
pub struct StructureBuilder<'p> {
    path: &'p TagPath,
}

impl<'p> StructureBuilder<'p> {
    pub fn new(path: &'p TagPath) -> Self {
        Self { path }
    }

    /// Place `replacement` under `level` at this builder's path.
    ///
    /// Intermediate segments that name an existing atomic tag fail with
    /// [`TreeError::StructureConflict`]; the conflict is detected before `level` is touched.
    /// At the terminal level any sibling sharing a placed name is removed and the new nodes
    /// are appended after the surviving siblings.
    #[instrument(skip_all, fields(path = %self.path, nodes = replacement.nodes.len()))]
    pub fn place(
        &self,
        level: &mut Vec<TreeNode>,
        replacement: &Replacement,
    ) -> Result<PlaceReport, TreeError> {
        let segments = self.path.segments();
        let final_is_folder = replacement.final_is_folder();
        let folder_count = if final_is_folder || segments.is_empty() {
            segments.len()
        } else {
            segments.len() - 1
        };

        check_structure(level, &segments[..folder_count], self.path)?;

        let mut report = PlaceReport::default();
        let terminal = descend_creating(level, &segments[..folder_count], &mut report);

        let mut doomed: Vec<&str> = replacement.nodes.iter().map(|n| n.name.as_str()).collect();
        if !final_is_folder {
            if let Some(last) = self.path.last() {
                doomed.push(last);
            }
        }
        let before = terminal.len();
        terminal.retain(|n| !doomed.contains(&n.name.as_str()));
        report.replaced = before - terminal.len();

        terminal.extend(replacement.nodes.iter().cloned());
        report.added = replacement.nodes.len();

        debug!(
            created_folders = report.created_folders,
            replaced = report.replaced,
            added = report.added,
            "Placed content"
        );
        Ok(report)
    }
}

/// Walk (and create) folders for `segments`, returning the innermost sibling sequence.
///
/// Callers must have run [`check_structure`] first.
fn descend_creating<'a>(
    level: &'a mut Vec<TreeNode>,
    segments: &[String],
    report: &mut PlaceReport,
) -> &'a mut Vec<TreeNode> {
    let mut level = level;
    for segment in segments {
        let index = match find_by_name(level, segment) {
            Some(i) => i,
            None => {
                level.push(TreeNode::folder(segment.clone()));
                report.created_folders += 1;
                level.len() - 1
            }
        };
        level = level[index].children_mut();
    }
    level
}

/// Fail if any of `segments` names an existing node that cannot hold children.
pub fn check_structure(
    level: &[TreeNode],
    segments: &[String],
    full_path: &TagPath,
) -> Result<(), TreeError> {
    let mut level = level;
    for segment in segments {
        match find_by_name(level, segment) {
            Some(i) => {
                let node = &level[i];
                if node.kind == TagKind::AtomicTag {
                    return Err(TreeError::StructureConflict {
                        path: full_path.to_string(),
                        segment: segment.clone(),
                        kind: node.kind.to_string(),
                    });
                }
                level = node.children();
            }
            None => return Ok(()),
        }
    }
    Ok(())
}

/// Ensure folders exist for every segment of `path`, returning the innermost children.
pub fn ensure_folders<'a>(
    level: &'a mut Vec<TreeNode>,
    path: &TagPath,
) -> Result<&'a mut Vec<TreeNode>, TreeError> {
    check_structure(level, path.segments(), path)?;
    let mut report = PlaceReport::default();
    Ok(descend_creating(level, path.segments(), &mut report))
}
