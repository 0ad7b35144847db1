//! Error types for the tag snapshot system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the pure tree algorithms (resolve, build, sort, merge).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Structure conflict at '{path}': segment '{segment}' is a {kind}, not a container")]
    StructureConflict {
        path: String,
        segment: String,
        kind: String,
    },

    #[error("UDT dependency cycle: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Malformed tag document {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Tag provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Tag path not found in provider '{provider}': {path}")]
    PathNotFound { provider: String, path: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Tag tree conflict: {0}")]
    Tree(#[from] TreeError),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by the export/import services and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Merge failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Import rejected: {0}")]
    ImportRejected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
