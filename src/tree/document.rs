//! Serialized tag documents: the root object of every file the layouts write.

use crate::tree::node::{TagKind, TreeNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of a serialized tag file.
///
/// Unlike [`TreeNode`], every root field is optional: a freshly created or flat
/// (`tags.json` / `udts.json`) file carries only a `tags` array, and flat path-tagged
/// collections may also carry a `udts` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "tagType", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TagKind>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TreeNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udts: Option<Vec<TreeNode>>,
}

impl TagDocument {
    /// Document holding only a `tags` array.
    pub fn with_tags(tags: Vec<TreeNode>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    /// True when nothing at all was loaded (missing, blank, or `{}` file).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.properties.is_empty()
            && self.tags.is_none()
            && self.udts.is_none()
    }

    pub fn tags(&self) -> &[TreeNode] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn tags_mut(&mut self) -> &mut Vec<TreeNode> {
        self.tags.get_or_insert_with(Vec::new)
    }

    pub fn udts(&self) -> &[TreeNode] {
        self.udts.as_deref().unwrap_or(&[])
    }

    pub fn udts_mut(&mut self) -> &mut Vec<TreeNode> {
        self.udts.get_or_insert_with(Vec::new)
    }

    /// View the document as a node, defaulting a missing root to an unnamed provider.
    ///
    /// Inverse of `From<TreeNode>`: a `typeId` property becomes the node's type reference.
    pub fn into_node(self) -> TreeNode {
        let kind = self.kind.unwrap_or(TagKind::Provider);
        let mut properties = self.properties;
        let type_ref = match properties.remove("typeId") {
            Some(Value::String(type_ref)) => Some(type_ref),
            Some(other) => {
                properties.insert("typeId".to_string(), other);
                None
            }
            None => None,
        };
        let children = match self.tags {
            None if kind.is_folder_like() => Some(Vec::new()),
            tags => tags,
        };
        TreeNode {
            name: self.name.unwrap_or_default(),
            kind,
            type_ref,
            properties,
            children,
        }
    }
}

impl From<TreeNode> for TagDocument {
    fn from(node: TreeNode) -> Self {
        let mut properties = node.properties;
        if let Some(type_ref) = node.type_ref {
            properties.insert("typeId".to_string(), Value::String(type_ref));
        }
        Self {
            name: Some(node.name),
            kind: Some(node.kind),
            properties,
            tags: node.children,
            udts: None,
        }
    }
}
