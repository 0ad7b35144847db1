//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, TargetsCommands};

/// Command name string for log spans (e.g. "export", "targets.validate").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Export { .. } => "export".to_string(),
        Commands::Import { .. } => "import".to_string(),
        Commands::Select { .. } => "select".to_string(),
        Commands::Merge { .. } => "merge".to_string(),
        Commands::SortTypes { .. } => "sort_types".to_string(),
        Commands::Targets { command, .. } => format!("targets.{}", targets_command_name(command)),
        Commands::Config { .. } => "config".to_string(),
        Commands::Providers { .. } => "providers".to_string(),
    }
}

pub fn targets_command_name(command: &TargetsCommands) -> &'static str {
    match command {
        TargetsCommands::List { .. } => "list",
        TargetsCommands::Validate { .. } => "validate",
        TargetsCommands::Modes { .. } => "modes",
    }
}
