//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::TagSyncConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(install_root: &Path) -> Result<TagSyncConfig, ConfigError> {
        MergeService::load(install_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<TagSyncConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> TagSyncConfig {
        TagSyncConfig::default()
    }
}
