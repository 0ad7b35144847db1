//! Type-separated layout: flat `tags` / `udts` lists whose entries carry their full path.

use crate::tree::builder::Replacement;
use crate::tree::node::{same_name, TagKind, TreeNode};
use crate::tree::walker::{Walker, WalkerConfig};
use crate::tree::{TagDocument, TagPath};
use serde_json::Value;

/// Property holding an entry's full tag path in a flat list.
pub const PATH_PROPERTY: &str = "path";

fn entry_path(node: &TreeNode) -> TagPath {
    node.properties
        .get(PATH_PROPERTY)
        .and_then(Value::as_str)
        .map(TagPath::parse)
        .unwrap_or_default()
}

/// Split replacement content into flat atomic (`tags`) and UDT (`udts`) streams.
///
/// Folders only contribute their descendants; UDT definitions and instances are emitted
/// whole. Each entry is stamped with its full path under `selected`.
pub fn flatten_streams(
    replacement: &Replacement,
    selected: &TagPath,
) -> (Vec<TreeNode>, Vec<TreeNode>) {
    let base = if replacement.container {
        selected.clone()
    } else {
        selected.parent().unwrap_or_default()
    };
    let config = WalkerConfig {
        descend_into_udts: false,
    };

    let mut tags = Vec::new();
    let mut udts = Vec::new();
    for entry in Walker::with_config(&replacement.nodes, config)
        .with_base(base)
        .walk()
    {
        let stream = match entry.node.kind {
            TagKind::AtomicTag => &mut tags,
            TagKind::UdtDefinition | TagKind::UdtInstance => &mut udts,
            TagKind::Folder | TagKind::Provider => continue,
        };
        stream.push(
            entry
                .node
                .clone()
                .with_property(PATH_PROPERTY, Value::String(entry.path.to_string())),
        );
    }
    (tags, udts)
}

/// Drop every existing entry under `selected` (segment-wise) and append the new streams.
///
/// An empty selection drops everything. Entries with no `path` are treated as living at the
/// root and survive any non-empty selection.
pub fn merge_flat(
    existing: &TagDocument,
    replacement: &Replacement,
    selected: &TagPath,
) -> TagDocument {
    let (tags, udts) = flatten_streams(replacement, selected);
    let mut merged = existing.clone();
    merged.tags = Some(filter_and_append(existing.tags(), tags, selected));
    if existing.udts.is_some() || !udts.is_empty() {
        merged.udts = Some(filter_and_append(existing.udts(), udts, selected));
    }
    merged
}

fn filter_and_append(
    existing: &[TreeNode],
    incoming: Vec<TreeNode>,
    selected: &TagPath,
) -> Vec<TreeNode> {
    existing
        .iter()
        .filter(|node| !entry_path(node).starts_with(selected))
        .cloned()
        .chain(incoming)
        .collect()
}

/// Replace the same-named entry of `doc.tags` with `node` (appending it last).
pub fn upsert_named(doc: &mut TagDocument, node: TreeNode) {
    let tags = doc.tags_mut();
    tags.retain(|t| !same_name(&t.name, &node.name));
    tags.push(node);
}
