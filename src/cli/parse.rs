//! CLI parse: clap types for tagsync. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tagsync CLI - version-controllable snapshots of tag configuration trees
#[derive(Parser)]
#[command(name = "tagsync")]
#[command(about = "Export, selectively merge and import tag configuration snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Install root that relative target paths resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides layered config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export every configured target in its layout
    Export {
        /// Export target collection (default: from configuration)
        #[arg(long)]
        export_config: Option<PathBuf>,
        /// Remove previously exported files of each target first
        #[arg(long)]
        delete_existing: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Import exported targets back into the tag store
    Import {
        /// Export target collection (default: from configuration)
        #[arg(long)]
        export_config: Option<PathBuf>,
        /// Only import targets of this provider
        #[arg(long)]
        provider: Option<String>,
        /// Abort a target when the existing-tag check fails instead of proceeding
        #[arg(long)]
        strict_detection: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-export one tag path into every target that covers it
    Select {
        /// Tag path, optionally provider-qualified: "[provider]Area1/Motor"
        path: String,
        /// Provider (required unless the path is qualified)
        #[arg(long)]
        provider: Option<String>,
        /// Export target collection (default: from configuration)
        #[arg(long)]
        export_config: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Merge a snapshot file into an exported document without a tag store
    Merge {
        /// Existing exported document
        existing: PathBuf,
        /// Snapshot of the selected node
        snapshot: PathBuf,
        /// Selected tag path the snapshot was taken at
        #[arg(long, default_value = "")]
        selected: String,
        /// Base tag path configured for the target
        #[arg(long, default_value = "")]
        base: String,
        /// Layout of the existing document
        #[arg(long, default_value = "singleFile")]
        mode: String,
        /// Root matching rule (full_path or last_segment; default: from configuration)
        #[arg(long)]
        target_match: Option<String>,
        /// Write the result here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Put the UDT definitions of a document in dependency order
    SortTypes {
        /// Document to reorder
        file: PathBuf,
        /// Rewrite the file instead of printing the result
        #[arg(long)]
        in_place: bool,
    },
    /// Inspect the export target collection
    Targets {
        /// Export target collection (default: from configuration)
        #[arg(long, global = true)]
        export_config: Option<PathBuf>,
        #[command(subcommand)]
        command: TargetsCommands,
    },
    /// Show the effective layered configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// List providers served by the tag store
    Providers {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum TargetsCommands {
    /// List configured targets
    List {
        /// Only list targets of this provider
        #[arg(long)]
        provider: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate the target collection
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the available export modes
    Modes {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
