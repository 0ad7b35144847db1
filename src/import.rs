//! Import service
//!
//! Reads an exported target back from disk in its layout and imports it into the tag store
//! under the target's base path, resolving collisions with the target's policy.

use crate::config::{ExportConfig, ExportTarget};
use crate::error::ApiError;
use crate::export::run_per_target;
use crate::layout;
use crate::store::{ImportSummary, InstallRoot, TagStore, TreeStore};
use crate::types::{CollisionPolicy, DetectionPolicy, TargetResults};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What one target import did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub provider: String,
    pub policy: CollisionPolicy,
    pub summary: ImportSummary,
}

impl ImportReport {
    pub fn message(&self) -> String {
        let s = &self.summary;
        format!(
            "Imported successfully: {} created, {} replaced, {} merged, {} skipped, {} deleted",
            s.created, s.replaced, s.merged, s.skipped, s.deleted
        )
    }
}

pub struct ImportService {
    tags: Arc<dyn TagStore>,
    files: Arc<dyn TreeStore>,
    root: InstallRoot,
    detection: DetectionPolicy,
}

impl ImportService {
    pub fn new(tags: Arc<dyn TagStore>, files: Arc<dyn TreeStore>, root: InstallRoot) -> Self {
        Self {
            tags,
            files,
            root,
            detection: DetectionPolicy::default(),
        }
    }

    pub fn with_detection(mut self, detection: DetectionPolicy) -> Self {
        self.detection = detection;
        self
    }

    /// Whether tags already exist under `target`'s base path, with a failed check resolved
    /// by the detection policy.
    fn existing_tags(&self, target: &ExportTarget) -> Result<bool, ApiError> {
        match self.tags.tags_exist(&target.provider, &target.base()) {
            Ok(exists) => Ok(exists),
            Err(e) => match self.detection {
                DetectionPolicy::Proceed => {
                    warn!(
                        provider = %target.provider,
                        error = %e,
                        "Existing-tag check failed, proceeding"
                    );
                    Ok(false)
                }
                DetectionPolicy::Abort => Err(ApiError::CollaboratorFailure(format!(
                    "Could not check existing tags in provider '{}': {}",
                    target.provider, e
                ))),
            },
        }
    }

    /// Import one target with its configured collision policy.
    #[instrument(skip(self, target), fields(provider = %target.provider, source = %target.source_path, policy = target.collision_policy.code()))]
    pub fn import_from_source(&self, target: &ExportTarget) -> Result<ImportReport, ApiError> {
        let source = target.output_path(&self.root);
        let nodes = layout::read_back(self.files.as_ref(), target.export_mode, &source)?;
        if nodes.is_empty() {
            return Err(ApiError::ImportRejected(format!(
                "No tags found at {}",
                source.display()
            )));
        }

        let policy = target.collision_policy;
        if policy == CollisionPolicy::Abort && self.existing_tags(target)? {
            return Err(ApiError::ImportRejected(format!(
                "Tags already exist at '{}' in provider '{}'",
                target.base(),
                target.provider
            )));
        }

        let summary = self
            .tags
            .import(&target.provider, &target.base(), nodes, policy)?;
        info!(
            created = summary.created,
            replaced = summary.replaced,
            merged = summary.merged,
            "Target imported"
        );
        Ok(ImportReport {
            provider: target.provider.clone(),
            policy,
            summary,
        })
    }

    /// Import every configured target, optionally restricted to one provider.
    pub fn import_all(&self, config: &ExportConfig, provider: Option<&str>) -> TargetResults {
        let targets: Vec<&ExportTarget> = config
            .targets
            .iter()
            .filter(|t| provider.map_or(true, |p| t.provider == p))
            .collect();
        run_per_target(&targets, |target| {
            self.import_from_source(target).map(|report| report.message())
        })
    }

    pub fn import_from_config(
        &self,
        config_path: &std::path::Path,
        provider: Option<&str>,
    ) -> Result<TargetResults, ApiError> {
        let config = ExportConfig::load(config_path)?;
        Ok(self.import_all(&config, provider))
    }
}
