//! Layered configuration loading and configuration-driven runs

use crate::integration::test_utils::{sample_provider, with_xdg_env, write_provider};
use std::fs;
use std::path::PathBuf;
use tagsync::cli::{Commands, RunContext};
use tagsync::config::{ConfigLoader, ExportConfig, ExportTarget, TagSyncConfig};
use tagsync::types::{DetectionPolicy, ExportMode, TargetMatch};
use tempfile::TempDir;

fn write_root_config(root: &std::path::Path, file: &str, contents: &str) {
    let dir = root.join("config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

#[test]
fn test_defaults_without_any_source() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let config = with_xdg_env(&test_dir, &[], || ConfigLoader::load(root.path()).unwrap());

    assert_eq!(config.snapshot_dir, PathBuf::from("data/tag-snapshots"));
    assert_eq!(config.merge.target_match, TargetMatch::FullPath);
    assert_eq!(config.merge.detection, DetectionPolicy::Proceed);
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_file_is_lowest_layer() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let global_dir = test_dir.path().join("xdg/tagsync");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "snapshot_dir = \"global-snaps\"\n[merge]\ndetection = \"abort\"\n",
    )
    .unwrap();
    write_root_config(root.path(), "config.toml", "snapshot_dir = \"root-snaps\"\n");

    let config = with_xdg_env(&test_dir, &[], || ConfigLoader::load(root.path()).unwrap());

    assert_eq!(config.snapshot_dir, PathBuf::from("root-snaps"));
    assert_eq!(config.merge.detection, DetectionPolicy::Abort);
}

#[test]
fn test_environment_specific_file_overrides_base() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_root_config(
        root.path(),
        "config.toml",
        "snapshot_dir = \"base\"\nexport_config = \"targets.json\"\n",
    );
    write_root_config(root.path(), "staging.toml", "snapshot_dir = \"staging\"\n");

    let config = with_xdg_env(&test_dir, &[("TAGSYNC_ENV", "staging")], || {
        ConfigLoader::load(root.path()).unwrap()
    });

    assert_eq!(config.snapshot_dir, PathBuf::from("staging"));
    assert_eq!(config.export_config, PathBuf::from("targets.json"));
}

#[test]
fn test_environment_variables_win() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_root_config(root.path(), "config.toml", "[merge]\ntarget_match = \"full_path\"\n");

    let config = with_xdg_env(
        &test_dir,
        &[("TAGSYNC__MERGE__TARGET_MATCH", "last_segment")],
        || ConfigLoader::load(root.path()).unwrap(),
    );

    assert_eq!(config.merge.target_match, TargetMatch::LastSegment);
}

#[test]
fn test_invalid_logging_format_fails_validation() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_root_config(root.path(), "config.toml", "[logging]\nformat = \"xml\"\n");

    let result = with_xdg_env(&test_dir, &[], || TagSyncConfig::load_validated(root.path()));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("Invalid format 'xml'"), "{}", err);
}

#[test]
fn test_run_context_uses_configured_locations() {
    let test_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_root_config(
        root.path(),
        "config.toml",
        "snapshot_dir = \"snaps\"\nexport_config = \"ci/targets.json\"\n",
    );
    let snaps = root.path().join("snaps");
    fs::create_dir_all(&snaps).unwrap();
    write_provider(root.path(), "default", &sample_provider());
    fs::rename(
        root.path().join("data/tag-snapshots/default.json"),
        snaps.join("default.json"),
    )
    .unwrap();
    ExportConfig::new(vec![ExportTarget::new(
        "default",
        "Area1",
        "out/area1.json",
        ExportMode::SingleFile,
    )])
    .save(&root.path().join("ci/targets.json"))
    .unwrap();

    let output = with_xdg_env(&test_dir, &[], || {
        let ctx = RunContext::new(root.path().to_path_buf(), None).unwrap();
        assert_eq!(ctx.config().snapshot_dir, PathBuf::from("snaps"));
        ctx.execute(&Commands::Export {
            export_config: None,
            delete_existing: false,
            format: "json".to_string(),
        })
        .unwrap()
    });

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["failed"], 0);
    assert_eq!(value["results"]["out/area1.json"]["status"], "success");
    assert!(root.path().join("out/area1.json").exists());
}
