//! Export service
//!
//! Orchestrates snapshot fetches, per-target locking, merging and persistence. Each target
//! is an independent unit of work: failures are reported per target and never abort the
//! rest of a batch.

mod full;
mod selective;

pub use full::FullExport;

use crate::concurrency::TargetLockManager;
use crate::config::{ExportConfig, ExportTarget};
use crate::error::ApiError;
use crate::store::{InstallRoot, TagStore, TreeStore};
use crate::tree::{TagPath, TreeNode};
use crate::types::{TargetMatch, TargetResult, TargetResults, UDT_TYPES_FOLDER};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a selective export, in the shape callers report back to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportOutcome {
    pub fn succeeded(path: &Path) -> Self {
        Self {
            success: true,
            file_path: Some(path.display().to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            file_path: None,
            error: Some(error.to_string()),
        }
    }

    pub fn into_target_result(self) -> TargetResult {
        match (self.success, self.error, self.file_path) {
            (true, _, path) => TargetResult::Success(format!(
                "Exported to {}",
                path.unwrap_or_default()
            )),
            (false, error, _) => TargetResult::Failed(error.unwrap_or_default()),
        }
    }
}

/// Export service
///
/// Holds the collaborators every export needs. Cheap to share across the per-target worker
/// threads of a batch.
pub struct ExportService {
    tags: Arc<dyn TagStore>,
    files: Arc<dyn TreeStore>,
    root: InstallRoot,
    locks: Arc<TargetLockManager>,
    target_match: TargetMatch,
}

impl ExportService {
    pub fn new(tags: Arc<dyn TagStore>, files: Arc<dyn TreeStore>, root: InstallRoot) -> Self {
        Self {
            tags,
            files,
            root,
            locks: Arc::new(TargetLockManager::new()),
            target_match: TargetMatch::default(),
        }
    }

    pub fn with_target_match(mut self, target_match: TargetMatch) -> Self {
        self.target_match = target_match;
        self
    }

    /// Share a lock registry with another service writing the same targets.
    pub fn with_locks(mut self, locks: Arc<TargetLockManager>) -> Self {
        self.locks = locks;
        self
    }

    pub fn install_root(&self) -> &InstallRoot {
        &self.root
    }

    fn fetch(&self, provider: &str, path: &TagPath) -> Result<TreeNode, ApiError> {
        self.tags.fetch(provider, path).map_err(|e| {
            ApiError::CollaboratorFailure(format!(
                "Failed to fetch '{}' from provider '{}': {}",
                path, provider, e
            ))
        })
    }

    /// Full export of every configured target, one worker thread per target.
    pub fn export_all(&self, config: &ExportConfig, delete_existing: bool) -> TargetResults {
        let targets: Vec<&ExportTarget> = config.targets.iter().collect();
        let results = run_per_target(&targets, |target| {
            self.export_tags(target, delete_existing).map(|export| {
                format!(
                    "Exported successfully using {} mode",
                    export.mode.display_name()
                )
            })
        });
        log_batch("export", &results);
        results
    }

    /// Load the target collection from `config_path` and export every target.
    pub fn export_from_config(
        &self,
        config_path: &Path,
        delete_existing: bool,
    ) -> Result<TargetResults, ApiError> {
        let config = ExportConfig::load(config_path)?;
        Ok(self.export_all(&config, delete_existing))
    }

    /// Selective export of `selected` into every target of `provider` that covers it.
    pub fn selective_export_matching(
        &self,
        config: &ExportConfig,
        provider: &str,
        selected: &TagPath,
    ) -> TargetResults {
        let targets = config.matching(provider, selected);
        if targets.is_empty() {
            warn!(provider, selected = %selected, "No export target covers the selection");
        }
        let results = run_per_target(&targets, |target| {
            let target_path = target.selective_path(selected, &self.root);
            let outcome = self.perform_selective_export(
                provider,
                selected,
                &target_path,
                target.export_mode,
                target.excludes_udt_definitions(),
                &target.base(),
            );
            match outcome.into_target_result() {
                TargetResult::Success(message) => Ok(message),
                TargetResult::Failed(error) => Err(ApiError::CollaboratorFailure(error)),
            }
        });
        log_batch("selective export", &results);
        results
    }
}

/// Drop the top-level `_types_` folder from a provider-root snapshot.
fn without_udt_definitions(mut snapshot: TreeNode) -> TreeNode {
    if let Some(children) = snapshot.children.as_mut() {
        children.retain(|n| n.name != UDT_TYPES_FOLDER);
    }
    snapshot
}

/// Run `work` for every target on its own scoped thread and collect the results keyed by
/// `sourcePath`.
pub(crate) fn run_per_target<F>(targets: &[&ExportTarget], work: F) -> TargetResults
where
    F: Fn(&ExportTarget) -> Result<String, ApiError> + Sync,
{
    let work = &work;
    std::thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|target| {
                let handle = scope.spawn(move || work(target));
                (target.source_path.clone(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(source, handle)| {
                let result = match handle.join() {
                    Ok(Ok(message)) => TargetResult::Success(message),
                    Ok(Err(e)) => TargetResult::Failed(e.to_string()),
                    Err(_) => TargetResult::Failed("Worker thread panicked".to_string()),
                };
                (source, result)
            })
            .collect()
    })
}

fn log_batch(operation: &str, results: &TargetResults) {
    let failed = results.values().filter(|r| !r.is_success()).count();
    info!(
        operation,
        targets = results.len(),
        failed,
        "Batch finished"
    );
}
