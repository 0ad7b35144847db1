//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::help::command_name;
use crate::cli::output::to_json;
use crate::cli::parse::{Commands, TargetsCommands};
use crate::cli::presentation::{
    format_issues_json, format_issues_text, format_modes_json, format_modes_text,
    format_providers_json, format_providers_text, format_results_json, format_results_text,
    format_targets_json, format_targets_text,
};
use crate::concurrency::TargetLockManager;
use crate::config::{ConfigLoader, ExportConfig, TagSyncConfig};
use crate::error::ApiError;
use crate::export::ExportService;
use crate::import::ImportService;
use crate::merge::{merge_selective, ExportPathSpec};
use crate::store::{load_or_empty, FileTagStore, FsTreeStore, InstallRoot, TagStore, TreeStore};
use crate::tree::sorter::order_sequence;
use crate::tree::{Replacement, TagPath};
use crate::types::{DetectionPolicy, ExportMode, TargetMatch, TargetResults};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, info_span};

/// Runtime context for CLI execution: install root, configuration and collaborators.
/// Built from the root path and optional config path using ConfigLoader only.
pub struct RunContext {
    root: InstallRoot,
    config: TagSyncConfig,
    tags: Arc<FileTagStore>,
    files: Arc<FsTreeStore>,
    locks: Arc<TargetLockManager>,
}

impl RunContext {
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&root)?,
        };
        let root = config.install_root_or(&root);
        let tags = Arc::new(FileTagStore::new(config.snapshot_path(&root)));
        Ok(Self {
            root,
            config,
            tags,
            files: Arc::new(FsTreeStore::new()),
            locks: Arc::new(TargetLockManager::new()),
        })
    }

    pub fn config(&self) -> &TagSyncConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = %command_name(command));
        let _entered = span.enter();
        let result = self.execute_inner(command);
        info!(ok = result.is_ok(), "Command finished");
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Export {
                export_config,
                delete_existing,
                format,
            } => {
                let config = self.load_targets(export_config.as_deref())?;
                let results = self.export_service().export_all(&config, *delete_existing);
                self.render_results("Export", &results, format)
            }
            Commands::Import {
                export_config,
                provider,
                strict_detection,
                format,
            } => {
                let config = self.load_targets(export_config.as_deref())?;
                let detection = if *strict_detection {
                    DetectionPolicy::Abort
                } else {
                    self.config.merge.detection
                };
                let service =
                    ImportService::new(self.tags.clone(), self.files.clone(), self.root.clone())
                        .with_detection(detection);
                let results = service.import_all(&config, provider.as_deref());
                self.render_results("Import", &results, format)
            }
            Commands::Select {
                path,
                provider,
                export_config,
                format,
            } => {
                let (qualified, selected) = TagPath::parse_qualified(path);
                let provider = qualified.or_else(|| provider.clone()).ok_or_else(|| {
                    ApiError::ConfigError(
                        "A provider is required: pass --provider or a \"[provider]path\" tag path"
                            .to_string(),
                    )
                })?;
                let config = self.load_targets(export_config.as_deref())?;
                let results = self
                    .export_service()
                    .selective_export_matching(&config, &provider, &selected);
                self.render_results("Selective Export", &results, format)
            }
            Commands::Merge {
                existing,
                snapshot,
                selected,
                base,
                mode,
                target_match,
                output,
            } => self.handle_merge(
                existing,
                snapshot,
                selected,
                base,
                mode,
                target_match.as_deref(),
                output.as_deref(),
            ),
            Commands::SortTypes { file, in_place } => self.handle_sort_types(file, *in_place),
            Commands::Targets {
                export_config,
                command,
            } => self.handle_targets_command(export_config.as_deref(), command),
            Commands::Config { format } => {
                if format == "json" {
                    to_json(&self.config)
                } else {
                    toml::to_string_pretty(&self.config).map_err(|e| {
                        ApiError::ConfigError(format!("Failed to render configuration: {}", e))
                    })
                }
            }
            Commands::Providers { format } => {
                let providers = self.tags.providers()?;
                if format == "json" {
                    to_json(&format_providers_json(&providers))
                } else {
                    Ok(format_providers_text(&providers))
                }
            }
        }
    }

    fn export_service(&self) -> ExportService {
        ExportService::new(self.tags.clone(), self.files.clone(), self.root.clone())
            .with_target_match(self.config.merge.target_match)
            .with_locks(self.locks.clone())
    }

    fn load_targets(&self, path: Option<&Path>) -> Result<ExportConfig, ApiError> {
        let path = match path {
            Some(p) => self.root.resolve(p),
            None => self.config.export_config_path(&self.root),
        };
        ExportConfig::load(&path)
    }

    fn render_results(
        &self,
        title: &str,
        results: &TargetResults,
        format: &str,
    ) -> Result<String, ApiError> {
        if format == "json" {
            to_json(&format_results_json(results))
        } else {
            Ok(format_results_text(title, results))
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_merge(
        &self,
        existing: &Path,
        snapshot: &Path,
        selected: &str,
        base: &str,
        mode: &str,
        target_match: Option<&str>,
        output: Option<&Path>,
    ) -> Result<String, ApiError> {
        let mode: ExportMode = mode.parse().map_err(ApiError::ConfigError)?;
        let target_match = match target_match {
            Some(raw) => parse_target_match(raw)?,
            None => self.config.merge.target_match,
        };
        let existing_doc = load_or_empty(self.files.as_ref(), &self.root.resolve(existing))?;
        let snapshot_doc = self
            .files
            .read(&self.root.resolve(snapshot))?
            .ok_or_else(|| {
                ApiError::CollaboratorFailure(format!(
                    "Snapshot {} is empty or missing",
                    snapshot.display()
                ))
            })?;

        let replacement = Replacement::from_snapshot(snapshot_doc.into_node());
        let spec = ExportPathSpec::new(TagPath::parse(selected), mode, TagPath::parse(base))
            .with_target_match(target_match);
        let merged = merge_selective(&existing_doc, &replacement, &spec)?;

        match output {
            Some(path) => {
                let path = self.root.resolve(path);
                self.files.write(&path, &merged)?;
                Ok(format!("Merged document written to {}", path.display()))
            }
            None => to_json(&merged),
        }
    }

    fn handle_sort_types(&self, file: &Path, in_place: bool) -> Result<String, ApiError> {
        let path = self.root.resolve(file);
        let mut doc = self.files.read(&path)?.ok_or_else(|| {
            ApiError::CollaboratorFailure(format!(
                "Document {} is empty or missing",
                path.display()
            ))
        })?;
        order_sequence(doc.tags_mut())?;
        if in_place {
            self.files.write(&path, &doc)?;
            Ok(format!("Sorted UDT definitions in {}", path.display()))
        } else {
            to_json(&doc)
        }
    }

    fn handle_targets_command(
        &self,
        export_config: Option<&Path>,
        command: &TargetsCommands,
    ) -> Result<String, ApiError> {
        match command {
            TargetsCommands::List { provider, format } => {
                let config = self.load_targets(export_config)?;
                let targets: Vec<_> = match provider {
                    Some(p) => config.for_provider(p).collect(),
                    None => config.targets.iter().collect(),
                };
                if format == "json" {
                    to_json(&format_targets_json(&targets))
                } else {
                    Ok(format_targets_text(&targets))
                }
            }
            TargetsCommands::Validate { format } => {
                let config = self.load_targets(export_config)?;
                let issues = config.validate();
                if format == "json" {
                    to_json(&format_issues_json(&issues))
                } else {
                    Ok(format_issues_text(&issues))
                }
            }
            TargetsCommands::Modes { format } => {
                if format == "json" {
                    to_json(&format_modes_json())
                } else {
                    Ok(format_modes_text())
                }
            }
        }
    }
}

fn parse_target_match(raw: &str) -> Result<TargetMatch, ApiError> {
    match raw {
        "full_path" => Ok(TargetMatch::FullPath),
        "last_segment" => Ok(TargetMatch::LastSegment),
        other => Err(ApiError::ConfigError(format!(
            "Unknown target match '{}' (expected full_path or last_segment)",
            other
        ))),
    }
}
