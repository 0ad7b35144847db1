//! Selective export: re-export one tag path into an existing target.

use super::{without_udt_definitions, ExportOutcome, ExportService};
use crate::error::ApiError;
use crate::layout::{self, individual, structured, PlannedFile};
use crate::merge::{merge_selective, single_item_dir, target_root, upsert_named, ExportPathSpec};
use crate::store::load_or_empty;
use crate::tree::sorter::order_sequence;
use crate::tree::{Replacement, TagDocument, TagPath};
use crate::types::ExportMode;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

impl ExportService {
    /// Fetch `selected` from `provider` and merge it into the serialized target at
    /// `target_path`, leaving everything outside the selection untouched.
    ///
    /// Never fails outright: errors are reported in the returned outcome.
    #[instrument(skip(self), fields(selected = %selected, target = %target_path.display(), mode = %mode))]
    pub fn perform_selective_export(
        &self,
        provider: &str,
        selected: &TagPath,
        target_path: &Path,
        mode: ExportMode,
        exclude_udt_definitions: bool,
        config_base: &TagPath,
    ) -> ExportOutcome {
        match self.try_selective_export(
            provider,
            selected,
            target_path,
            mode,
            exclude_udt_definitions,
            config_base,
        ) {
            Ok(written) => {
                info!(path = %written.display(), "Selective export written");
                ExportOutcome::succeeded(&written)
            }
            Err(e) => {
                error!(error = %e, "Selective export failed");
                ExportOutcome::failed(e)
            }
        }
    }

    fn try_selective_export(
        &self,
        provider: &str,
        selected: &TagPath,
        target_path: &Path,
        mode: ExportMode,
        exclude_udt_definitions: bool,
        config_base: &TagPath,
    ) -> Result<PathBuf, ApiError> {
        let mut snapshot = self.fetch(provider, selected)?;
        if exclude_udt_definitions && selected.is_root() {
            snapshot = without_udt_definitions(snapshot);
        }
        let replacement = Replacement::from_snapshot(snapshot);
        let spec = ExportPathSpec::new(selected.clone(), mode, config_base.clone())
            .with_target_match(self.target_match);
        let keep_types = exclude_udt_definitions && selected.is_root();

        // Same key a full export of the target takes.
        let lock_root = match mode {
            ExportMode::SingleFile => target_path.to_path_buf(),
            _ if is_document_path(target_path) => target_path.to_path_buf(),
            _ => target_root(target_path, selected, config_base),
        };
        self.locks.with_target(&lock_root, || match mode {
            ExportMode::SingleFile => self.merge_into_file(&replacement, &spec, target_path),
            ExportMode::StructuredByType if is_document_path(target_path) => {
                self.merge_into_file(&replacement, &spec, target_path)
            }
            ExportMode::StructuredByType => {
                self.write_structured_dir(&replacement, target_path, keep_types)
            }
            ExportMode::IndividualFiles => {
                self.write_individual_dir(&replacement, &spec, target_path, keep_types)
            }
        })
    }

    /// Read-merge-write of one document.
    fn merge_into_file(
        &self,
        replacement: &Replacement,
        spec: &ExportPathSpec,
        target: &Path,
    ) -> Result<PathBuf, ApiError> {
        let existing = load_or_empty(self.files.as_ref(), target)?;
        let merged = merge_selective(&existing, replacement, spec)?;
        self.files.write(target, &merged)?;
        Ok(target.to_path_buf())
    }

    /// Directory variant of the type-separated layout.
    ///
    /// A single item is upserted into the stream file of the directory that holds it; a
    /// container replaces everything below the target directory.
    fn write_structured_dir(
        &self,
        replacement: &Replacement,
        target: &Path,
        keep_types: bool,
    ) -> Result<PathBuf, ApiError> {
        match (replacement.container, replacement.nodes.as_slice()) {
            (false, [node]) => {
                let dir = single_item_dir(target, &node.name);
                let file = dir.join(structured::stream_file(node.kind));
                let mut doc = load_or_empty(self.files.as_ref(), &file)?;
                upsert_named(&mut doc, node.clone());
                order_sequence(doc.tags_mut())?;
                self.files.write(&file, &doc)?;
                if dir != target {
                    self.files.remove_dir_if_empty(target)?;
                }
                Ok(file)
            }
            (_, nodes) => {
                let planned = structured::plan(nodes, target)?;
                self.replace_directory(target, planned, keep_types)
            }
        }
    }

    fn write_individual_dir(
        &self,
        replacement: &Replacement,
        spec: &ExportPathSpec,
        target: &Path,
        keep_types: bool,
    ) -> Result<PathBuf, ApiError> {
        match (replacement.container, replacement.nodes.as_slice()) {
            (false, [node]) => {
                let dir = single_item_dir(target, &node.name);
                let file = individual::item_file(&dir, &node.name);
                let doc = merge_selective(&TagDocument::default(), replacement, spec)?;
                self.files.write(&file, &doc)?;
                if dir != target {
                    self.files.remove_dir_if_empty(target)?;
                }
                Ok(file)
            }
            (_, nodes) => {
                let planned = individual::plan(nodes, target);
                self.replace_directory(target, planned, keep_types)
            }
        }
    }

    fn replace_directory(
        &self,
        target: &Path,
        planned: Vec<PlannedFile>,
        keep_types: bool,
    ) -> Result<PathBuf, ApiError> {
        let removed = layout::clear_directory(self.files.as_ref(), target, keep_types)?;
        for file in &planned {
            self.files.write(&file.path, &file.document)?;
        }
        debug!(removed, written = planned.len(), "Replaced target directory");
        Ok(target.to_path_buf())
    }
}

fn is_document_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
