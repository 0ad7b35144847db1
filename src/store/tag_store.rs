//! Snapshot-backed tag store
//!
//! Serves each provider from `<root>/<provider>.json`, a consolidated document whose root is
//! the provider. Used by the CLI when no live gateway is attached, and by tests.

use crate::error::StorageError;
use crate::store::{FsTreeStore, ImportSummary, TagStore, TreeStore};
use crate::tree::builder::ensure_folders;
use crate::tree::node::find_by_name;
use crate::tree::resolver::{locate, parent_level_mut, resolve, Resolution};
use crate::tree::{TagDocument, TagKind, TagPath, TreeNode};
use crate::types::{CollisionPolicy, UDT_TYPES_FOLDER};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub struct FileTagStore {
    root: PathBuf,
    files: FsTreeStore,
    lock: RwLock<()>,
}

impl FileTagStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: FsTreeStore::new(),
            lock: RwLock::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn provider_file(&self, provider: &str) -> PathBuf {
        self.root.join(format!("{}.json", provider))
    }

    fn load(&self, provider: &str) -> Result<TagDocument, StorageError> {
        self.files
            .read(&self.provider_file(provider))?
            .ok_or_else(|| StorageError::ProviderNotFound(provider.to_string()))
    }

    fn save(&self, provider: &str, doc: &TagDocument) -> Result<(), StorageError> {
        self.files.write(&self.provider_file(provider), doc)
    }

    /// Create an empty provider document if none exists.
    pub fn create_provider(&self, provider: &str) -> Result<(), StorageError> {
        let _guard = self.lock.write();
        if self.files.read(&self.provider_file(provider))?.is_some() {
            return Ok(());
        }
        let mut doc = TagDocument::with_tags(Vec::new());
        doc.name = Some(String::new());
        doc.kind = Some(TagKind::Provider);
        self.save(provider, &doc)
    }
}

impl TagStore for FileTagStore {
    fn providers(&self) -> Result<Vec<String>, StorageError> {
        let _guard = self.lock.read();
        let mut providers: Vec<String> = self
            .files
            .list_documents(&self.root)?
            .into_iter()
            .filter(|p| p.parent() == Some(self.root.as_path()))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        providers.sort();
        Ok(providers)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn fetch(&self, provider: &str, path: &TagPath) -> Result<TreeNode, StorageError> {
        let _guard = self.lock.read();
        let root = self.load(provider)?.into_node();
        let node = locate(&root, path)
            .cloned()
            .ok_or_else(|| StorageError::PathNotFound {
                provider: provider.to_string(),
                path: path.to_string(),
            })?;
        debug!(nodes = node.subtree_len(), "Fetched snapshot");
        Ok(node)
    }

    fn tags_exist(&self, provider: &str, base: &TagPath) -> Result<bool, StorageError> {
        let _guard = self.lock.read();
        let root = self.load(provider)?.into_node();
        if base.is_root() {
            return Ok(root
                .children()
                .iter()
                .any(|n| n.name != UDT_TYPES_FOLDER));
        }
        Ok(match locate(&root, base) {
            Some(node) if node.kind == TagKind::Folder => node.has_children(),
            Some(_) => true,
            None => false,
        })
    }

    #[instrument(skip(self, nodes), fields(base = %base, count = nodes.len(), policy = policy.code()))]
    fn import(
        &self,
        provider: &str,
        base: &TagPath,
        nodes: Vec<TreeNode>,
        policy: CollisionPolicy,
    ) -> Result<ImportSummary, StorageError> {
        let _guard = self.lock.write();
        let mut doc = self.load(provider)?;
        let level = ensure_folders(doc.tags_mut(), base)?;

        let mut summary = ImportSummary::default();
        if policy == CollisionPolicy::DeleteAndReplace {
            summary.deleted = level.len();
            level.clear();
        }

        for node in nodes {
            match (find_by_name(level, &node.name), policy) {
                (None, _) => {
                    level.push(node);
                    summary.created += 1;
                }
                (Some(_), CollisionPolicy::Abort) => summary.skipped += 1,
                (Some(i), CollisionPolicy::Merge) => {
                    merge_node(&mut level[i], node);
                    summary.merged += 1;
                }
                (Some(i), _) => {
                    level[i] = node;
                    summary.replaced += 1;
                }
            }
        }

        self.save(provider, &doc)?;
        info!(
            created = summary.created,
            replaced = summary.replaced,
            merged = summary.merged,
            skipped = summary.skipped,
            "Imported tags"
        );
        Ok(summary)
    }

    fn delete(&self, provider: &str, path: &TagPath) -> Result<bool, StorageError> {
        let _guard = self.lock.write();
        let mut doc = self.load(provider)?;
        let removed = if path.is_root() {
            let had = !doc.tags().is_empty();
            doc.tags_mut().clear();
            had
        } else {
            match resolve(doc.tags(), path) {
                Resolution::Found { indices, .. } => {
                    match parent_level_mut(doc.tags_mut(), &indices) {
                        Some((level, i)) => {
                            level.remove(i);
                            true
                        }
                        None => false,
                    }
                }
                Resolution::Missing { .. } => false,
            }
        };
        if removed {
            self.save(provider, &doc)?;
        }
        Ok(removed)
    }
}

/// Recursive merge: incoming kind, type and properties win; children are merged by name.
fn merge_node(existing: &mut TreeNode, incoming: TreeNode) {
    existing.kind = incoming.kind;
    if incoming.type_ref.is_some() {
        existing.type_ref = incoming.type_ref;
    }
    for (key, value) in incoming.properties {
        existing.properties.insert(key, value);
    }
    if let Some(children) = incoming.children {
        let level = existing.children_mut();
        for child in children {
            match find_by_name(level, &child.name) {
                Some(i) => merge_node(&mut level[i], child),
                None => level.push(child),
            }
        }
    }
}
