//! Full export of one configured target.

use super::{ExportService, without_udt_definitions};
use crate::config::ExportTarget;
use crate::error::ApiError;
use crate::layout::{self, ExportPlan};
use crate::types::ExportMode;
use std::path::PathBuf;
use tracing::{info, instrument};

/// What a full export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullExport {
    pub output: PathBuf,
    pub mode: ExportMode,
    pub files_written: usize,
    pub files_removed: usize,
}

impl ExportService {
    /// Export everything under the target's base path in the target's layout.
    ///
    /// With `delete_existing`, files previously written for the target are removed first so
    /// tags deleted upstream do not linger on disk.
    #[instrument(skip(self, target), fields(provider = %target.provider, source = %target.source_path, mode = %target.export_mode))]
    pub fn export_tags(
        &self,
        target: &ExportTarget,
        delete_existing: bool,
    ) -> Result<FullExport, ApiError> {
        let base = target.base();
        let output = target.output_path(&self.root);
        let mut snapshot = self.fetch(&target.provider, &base)?;
        if target.excludes_udt_definitions() {
            snapshot = without_udt_definitions(snapshot);
        }

        let planned = ExportPlan {
            mode: target.export_mode,
            snapshot: &snapshot,
            base: &base,
            output: &output,
            exclude_udt_definitions: target.excludes_udt_definitions(),
        }
        .plan()?;

        let files_removed = self.locks.with_target(&output, || -> Result<usize, ApiError> {
            let removed = if delete_existing {
                layout::remove_existing(self.files.as_ref(), target.export_mode, &output)?
            } else {
                0
            };
            for file in &planned {
                self.files.write(&file.path, &file.document)?;
            }
            Ok(removed)
        })?;

        info!(
            output = %output.display(),
            written = planned.len(),
            removed = files_removed,
            "Target exported"
        );
        Ok(FullExport {
            output,
            mode: target.export_mode,
            files_written: planned.len(),
            files_removed,
        })
    }
}
