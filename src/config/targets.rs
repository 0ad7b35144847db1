//! Export target collection
//!
//! A JSON array of target entries, each naming a provider, the base tag path it covers,
//! the output location and the layout used there.

use crate::error::ApiError;
use crate::merge::target_location;
use crate::store::{normalize_path, InstallRoot};
use crate::tree::TagPath;
use crate::types::{CollisionPolicy, ExportMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn default_collision_policy() -> CollisionPolicy {
    CollisionPolicy::Overwrite
}

/// One export target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTarget {
    pub provider: String,

    /// Tag path this target covers; `""` is the provider root
    #[serde(default)]
    pub base_tag_path: String,

    /// Output file (`singleFile`) or directory, relative to the install root unless absolute
    pub source_path: String,

    pub export_mode: ExportMode,

    #[serde(default = "default_collision_policy")]
    pub collision_policy: CollisionPolicy,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_udt_definitions: bool,
}

impl ExportTarget {
    pub fn new(
        provider: impl Into<String>,
        base_tag_path: impl Into<String>,
        source_path: impl Into<String>,
        export_mode: ExportMode,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_tag_path: base_tag_path.into(),
            source_path: source_path.into(),
            export_mode,
            collision_policy: default_collision_policy(),
            exclude_udt_definitions: false,
        }
    }

    pub fn base(&self) -> TagPath {
        TagPath::parse(&self.base_tag_path)
    }

    /// `excludeUdtDefinitions` only applies to provider-root targets.
    pub fn excludes_udt_definitions(&self) -> bool {
        self.exclude_udt_definitions && self.base().is_root()
    }

    /// Absolute output location of the whole target.
    pub fn output_path(&self, root: &InstallRoot) -> PathBuf {
        root.resolve(&self.source_path)
    }

    /// Where a selective export of `selected` lands for this target: the file itself for
    /// `singleFile`, otherwise the directory mirroring `selected` below the base.
    pub fn selective_path(&self, selected: &TagPath, root: &InstallRoot) -> PathBuf {
        let output = self.output_path(root);
        match self.export_mode {
            ExportMode::SingleFile => output,
            _ => target_location(&output, selected, &self.base()),
        }
    }

    /// Whether a selection in `provider` at `selected` falls inside this target.
    pub fn covers(&self, provider: &str, selected: &TagPath) -> bool {
        self.provider == provider && selected.is_under(&self.base())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A validation finding for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIssue {
    pub index: usize,
    pub source_path: String,
    pub severity: IssueSeverity,
    pub message: String,
}

/// The whole target collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportConfig {
    pub targets: Vec<ExportTarget>,
}

impl ExportConfig {
    pub fn new(targets: Vec<ExportTarget>) -> Self {
        Self { targets }
    }

    /// Read the collection. A missing file is a configuration error.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Config file not found at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            ApiError::ConfigError(format!("Invalid export config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), targets = config.targets.len(), "Loaded export config");
        Ok(config)
    }

    /// Write the collection, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ApiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| {
            ApiError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn for_provider<'a>(&'a self, provider: &'a str) -> impl Iterator<Item = &'a ExportTarget> {
        self.targets.iter().filter(move |t| t.provider == provider)
    }

    /// Every target whose base covers `selected` in `provider`.
    pub fn matching(&self, provider: &str, selected: &TagPath) -> Vec<&ExportTarget> {
        self.targets
            .iter()
            .filter(|t| t.covers(provider, selected))
            .collect()
    }

    pub fn validate(&self) -> Vec<TargetIssue> {
        let mut issues = Vec::new();
        let mut seen: HashMap<PathBuf, usize> = HashMap::new();

        for (index, target) in self.targets.iter().enumerate() {
            let mut push = |severity, message: String| {
                issues.push(TargetIssue {
                    index,
                    source_path: target.source_path.clone(),
                    severity,
                    message,
                })
            };

            if target.provider.trim().is_empty() {
                push(IssueSeverity::Error, "Provider cannot be empty".to_string());
            }
            if target.source_path.trim().is_empty() {
                push(IssueSeverity::Error, "sourcePath cannot be empty".to_string());
            } else {
                let key = normalize_path(Path::new(target.source_path.trim()));
                match seen.get(&key).copied() {
                    Some(first) => push(
                        IssueSeverity::Error,
                        format!("sourcePath is also used by target #{}", first + 1),
                    ),
                    None => {
                        seen.insert(key, index);
                    }
                }
            }
            if target.exclude_udt_definitions && !target.base().is_root() {
                warn!(
                    source_path = %target.source_path,
                    base = %target.base_tag_path,
                    "excludeUdtDefinitions ignored for a non-root base path"
                );
                push(
                    IssueSeverity::Warning,
                    "excludeUdtDefinitions only applies when baseTagPath is empty".to_string(),
                );
            }
        }

        issues
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }
}
