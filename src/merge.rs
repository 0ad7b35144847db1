//! Selective merge: splice freshly fetched content for one tag path into a previously
//! serialized document without disturbing anything outside that path.
//!
//! Every merge is a pure function of the existing document, the replacement, and the
//! [`ExportPathSpec`]; the existing document is never mutated, so a failed merge leaves the
//! caller's copy intact.

mod consolidated;
mod individual;
mod normalize;
mod structured;

pub use consolidated::{merge_consolidated, search_path};
pub use individual::{
    document_for, relative_target, single_item_dir, target_location, target_root,
};
pub use normalize::normalize_root;
pub use structured::{flatten_streams, merge_flat, upsert_named, PATH_PROPERTY};

use crate::error::TreeError;
use crate::tree::{Replacement, TagDocument, TagPath};
use crate::types::{ExportMode, TargetMatch};
use tracing::{debug, instrument};

/// Describes one merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPathSpec {
    /// Path that was fetched (empty = whole provider).
    pub selected: TagPath,
    pub layout: ExportMode,
    /// Base tag path configured for the output target.
    pub base: TagPath,
    pub target_match: TargetMatch,
}

impl ExportPathSpec {
    pub fn new(selected: TagPath, layout: ExportMode, base: TagPath) -> Self {
        Self {
            selected,
            layout,
            base,
            target_match: TargetMatch::default(),
        }
    }

    pub fn with_target_match(mut self, target_match: TargetMatch) -> Self {
        self.target_match = target_match;
        self
    }
}

/// Merge `replacement` into `existing` according to `spec.layout`.
///
/// - `singleFile`: nested splice, then the root is normalized from `spec.base`.
/// - `structuredByType`: flat path-tagged `tags`/`udts` lists, filtered by `spec.selected`.
/// - `individualFiles`: the file is the node; the result is the replacement itself.
#[instrument(skip_all, fields(selected = %spec.selected, layout = %spec.layout, base = %spec.base))]
pub fn merge_selective(
    existing: &TagDocument,
    replacement: &Replacement,
    spec: &ExportPathSpec,
) -> Result<TagDocument, TreeError> {
    let merged = match spec.layout {
        ExportMode::SingleFile => merge_consolidated(existing, replacement, spec)?,
        ExportMode::StructuredByType => merge_flat(existing, replacement, &spec.selected),
        ExportMode::IndividualFiles => document_for(replacement, &spec.selected),
    };
    debug!(top_level = merged.tags().len(), "Merge completed");
    Ok(merged)
}
