//! Configuration System
//!
//! Two layers of configuration:
//! - [`TagSyncConfig`]: application settings, layered from defaults, the global config file,
//!   the install root's `config/` directory and `TAGSYNC__*` environment variables.
//! - [`ExportConfig`]: the collection of export targets, a JSON array read and written as a
//!   whole.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::InstallRoot;
use crate::types::{DetectionPolicy, TargetMatch};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod facade;
mod merge {
    pub mod merge_policy;
    pub mod service;
}
mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod workspace_file;
}
pub mod targets;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use targets::{ExportConfig, ExportTarget, TargetIssue};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSyncConfig {
    /// Directory relative target paths resolve against (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,

    /// Export target collection, relative to the install root unless absolute
    #[serde(default = "default_export_config")]
    pub export_config: PathBuf,

    /// Directory of provider snapshots served by the file-backed tag store
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    #[serde(default)]
    pub merge: MergeSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Merge and import behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// What to do when checking for existing tags fails during import
    #[serde(default)]
    pub detection: DetectionPolicy,

    /// How a loaded consolidated file's root is recognised as the selected node
    #[serde(default)]
    pub target_match: TargetMatch,
}

pub(crate) fn default_export_config() -> PathBuf {
    PathBuf::from("data/tag-cicd/export-config.json")
}

pub(crate) fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data/tag-snapshots")
}

impl Default for TagSyncConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            export_config: default_export_config(),
            snapshot_dir: default_snapshot_dir(),
            merge: MergeSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Path '{0}' cannot be empty")]
    EmptyPath(&'static str),

    #[error("Logging: {0}")]
    Logging(String),
}

impl TagSyncConfig {
    /// Install root, falling back to `fallback` when none is configured.
    pub fn install_root_or(&self, fallback: &Path) -> InstallRoot {
        InstallRoot::new(
            self.install_root
                .clone()
                .unwrap_or_else(|| fallback.to_path_buf()),
        )
    }

    pub fn export_config_path(&self, root: &InstallRoot) -> PathBuf {
        root.resolve(&self.export_config)
    }

    pub fn snapshot_path(&self, root: &InstallRoot) -> PathBuf {
        root.resolve(&self.snapshot_dir)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.export_config.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath("export_config"));
        }
        if self.snapshot_dir.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath("snapshot_dir"));
        }
        if !["json", "text"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}' (must be 'json' or 'text')",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Load and validate, folding validation failures into one error.
    pub fn load_validated(install_root: &Path) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(install_root)?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
