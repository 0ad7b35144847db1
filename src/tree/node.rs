//! Tag node types and the sibling-sequence primitives the merge engine composes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Kind of a tag node (`tagType` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// Absolute root of a tag provider
    Provider,
    Folder,
    /// Leaf value
    AtomicTag,
    /// Composite type definition
    #[serde(rename = "UdtType")]
    UdtDefinition,
    /// Composite type instance
    UdtInstance,
}

impl TagKind {
    /// Kinds that hold other tags purely as structure.
    pub fn is_folder_like(&self) -> bool {
        matches!(self, TagKind::Provider | TagKind::Folder)
    }

    /// Composite kinds (definition or instance).
    pub fn is_udt(&self) -> bool {
        matches!(self, TagKind::UdtDefinition | TagKind::UdtInstance)
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            TagKind::Provider => "Provider",
            TagKind::Folder => "Folder",
            TagKind::AtomicTag => "AtomicTag",
            TagKind::UdtDefinition => "UdtType",
            TagKind::UdtInstance => "UdtInstance",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One entry in the tag configuration tree.
///
/// Serialized as `{ "name", "tagType", "typeId"?, ...properties, "tags"? }`. Properties are
/// carried verbatim and in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,

    #[serde(rename = "tagType")]
    pub kind: TagKind,

    /// Definition instantiated by a `UdtInstance`
    #[serde(rename = "typeId", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,

    #[serde(rename = "tags", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, kind: TagKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_ref: None,
            properties: Map::new(),
            children: None,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(name, TagKind::Folder).with_children(Vec::new())
    }

    pub fn atomic(name: impl Into<String>) -> Self {
        Self::new(name, TagKind::AtomicTag)
    }

    pub fn udt_definition(name: impl Into<String>) -> Self {
        Self::new(name, TagKind::UdtDefinition)
    }

    pub fn udt_instance(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        let mut node = Self::new(name, TagKind::UdtInstance);
        node.type_ref = Some(type_ref.into());
        node
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Children, or an empty slice for leaves.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Mutable children, creating an empty sequence if absent.
    pub fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        self.children.get_or_insert_with(Vec::new)
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn find_child(&self, name: &str) -> Option<&TreeNode> {
        find_by_name(self.children(), name).map(|i| &self.children()[i])
    }

    /// Total replacement; order preserved as given.
    pub fn replace_children(&mut self, children: Vec<TreeNode>) {
        self.children = Some(children);
    }

    pub fn remove_child(&mut self, name: &str) -> Option<TreeNode> {
        self.children.as_mut().and_then(|c| remove_by_name(c, name))
    }

    pub fn insert_child(&mut self, child: TreeNode, position: Option<usize>) {
        insert_at(self.children_mut(), child, position);
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(TreeNode::subtree_len).sum::<usize>()
    }
}

/// Name equality up to Unicode canonical equivalence.
///
/// Path segments are NFC-normalized while names read from files are kept as written, so a
/// decomposed `Cafe\u{301}` on disk must still match the selection `Café`.
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.nfc().eq(b.nfc())
}

/// Index of the sibling named `name`.
pub fn find_by_name(siblings: &[TreeNode], name: &str) -> Option<usize> {
    siblings.iter().position(|n| same_name(&n.name, name))
}

/// Remove the sibling named `name`, keeping the order of the rest.
pub fn remove_by_name(siblings: &mut Vec<TreeNode>, name: &str) -> Option<TreeNode> {
    find_by_name(siblings, name).map(|i| siblings.remove(i))
}

/// Insert `node` at `position` (clamped), or append when no position is given.
pub fn insert_at(siblings: &mut Vec<TreeNode>, node: TreeNode, position: Option<usize>) {
    match position {
        Some(i) => siblings.insert(i.min(siblings.len()), node),
        None => siblings.push(node),
    }
}
