//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("export_config", "data/tag-cicd/export-config.json")?
        .set_default("snapshot_dir", "data/tag-snapshots")?
        .set_default("merge.detection", "proceed")?
        .set_default("merge.target_match", "full_path")
}
