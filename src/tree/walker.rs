//! Depth-first walker over tag trees

use crate::tree::node::{TagKind, TreeNode};
use crate::tree::path::TagPath;

/// One visited node with its path relative to the walk root.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub path: TagPath,
    pub depth: usize,
    pub node: &'a TreeNode,
}

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to visit the children of UDT definitions and instances (default: true)
    pub descend_into_udts: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            descend_into_udts: true,
        }
    }
}

/// Pre-order walker over a sibling sequence.
pub struct Walker<'a> {
    roots: &'a [TreeNode],
    base: TagPath,
    config: WalkerConfig,
}

impl<'a> Walker<'a> {
    /// Walk `roots`, reporting paths relative to them.
    pub fn new(roots: &'a [TreeNode]) -> Self {
        Self {
            roots,
            base: TagPath::root(),
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(roots: &'a [TreeNode], config: WalkerConfig) -> Self {
        Self {
            roots,
            base: TagPath::root(),
            config,
        }
    }

    /// Prefix every reported path with `base`.
    pub fn with_base(mut self, base: TagPath) -> Self {
        self.base = base;
        self
    }

    /// Collect every entry in pre-order (parent before children, siblings in order).
    pub fn walk(&self) -> Vec<Entry<'a>> {
        let mut entries = Vec::new();
        let mut stack: Vec<(&'a TreeNode, TagPath, usize)> = self
            .roots
            .iter()
            .rev()
            .map(|n| (n, self.base.join(&n.name), 0))
            .collect();

        while let Some((node, path, depth)) = stack.pop() {
            if self.config.descend_into_udts || !node.kind.is_udt() {
                for child in node.children().iter().rev() {
                    stack.push((child, path.join(&child.name), depth + 1));
                }
            }
            entries.push(Entry { path, depth, node });
        }

        entries
    }

}

/// Every UDT instance anywhere below `node` (not including `node` itself).
pub fn nested_instances(node: &TreeNode) -> Vec<&TreeNode> {
    Walker::new(node.children())
        .walk()
        .into_iter()
        .map(|e| e.node)
        .filter(|n| n.kind == TagKind::UdtInstance)
        .collect()
}
