//! Core types shared by the merge engine, the layouts, and the orchestration services.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of the folder that holds UDT definitions at the top of a provider.
pub const UDT_TYPES_FOLDER: &str = "_types_";

/// File holding atomic tags in the structured layout.
pub const TAGS_FILE: &str = "tags.json";

/// File holding UDT instances and definitions in the structured layout.
pub const UDTS_FILE: &str = "udts.json";

/// On-disk shape of an export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportMode {
    /// One consolidated tree in a single JSON file.
    #[serde(rename = "singleFile")]
    SingleFile,
    /// One file per tag, one directory per folder.
    #[serde(rename = "individualFiles")]
    IndividualFiles,
    /// Per-folder `tags.json` / `udts.json` split by tag kind.
    #[serde(rename = "structuredByType")]
    StructuredByType,
}

impl ExportMode {
    pub const ALL: [ExportMode; 3] = [
        ExportMode::SingleFile,
        ExportMode::IndividualFiles,
        ExportMode::StructuredByType,
    ];

    /// Wire code used in export configuration entries.
    pub fn code(&self) -> &'static str {
        match self {
            ExportMode::SingleFile => "singleFile",
            ExportMode::IndividualFiles => "individualFiles",
            ExportMode::StructuredByType => "structuredByType",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportMode::SingleFile => "Single File",
            ExportMode::IndividualFiles => "Individual Files",
            ExportMode::StructuredByType => "Structured By Type",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportMode::ALL
            .into_iter()
            .find(|mode| mode.code() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown export mode '{}' (expected singleFile, individualFiles or structuredByType)",
                    s
                )
            })
    }
}

/// What happens when imported content lands on tags that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionPolicy {
    #[serde(rename = "a")]
    Abort,
    #[serde(rename = "m")]
    Merge,
    #[serde(rename = "o")]
    Overwrite,
    #[serde(rename = "d")]
    DeleteAndReplace,
}

impl CollisionPolicy {
    pub fn code(&self) -> &'static str {
        match self {
            CollisionPolicy::Abort => "a",
            CollisionPolicy::Merge => "m",
            CollisionPolicy::Overwrite => "o",
            CollisionPolicy::DeleteAndReplace => "d",
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "abort" => Ok(CollisionPolicy::Abort),
            "m" | "merge" => Ok(CollisionPolicy::Merge),
            "o" | "overwrite" => Ok(CollisionPolicy::Overwrite),
            "d" | "deleteAndReplace" => Ok(CollisionPolicy::DeleteAndReplace),
            other => Err(format!("Unknown collision policy '{}'", other)),
        }
    }
}

/// Behaviour when checking for existing tags fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPolicy {
    /// Treat a failed check as "nothing exists" and carry on.
    #[default]
    Proceed,
    /// Treat a failed check as fatal for that target.
    Abort,
}

/// How the consolidated merger decides that a loaded file's root is the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMatch {
    /// The root is the target only when the selected path equals the configured base path.
    #[default]
    FullPath,
    /// The root is the target whenever its name equals the selected path's last segment.
    LastSegment,
}

/// Outcome of one target in a batch export or import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum TargetResult {
    Success(String),
    Failed(String),
}

impl TargetResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TargetResult::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            TargetResult::Success(message) | TargetResult::Failed(message) => message,
        }
    }
}

/// Per-target results keyed by the target's `sourcePath`.
pub type TargetResults = BTreeMap<String, TargetResult>;
