//! Export, clear, and import back through each layout

use crate::integration::test_utils::{names, sample_provider, write_provider};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tagsync::config::{ExportConfig, ExportTarget};
use tagsync::error::ApiError;
use tagsync::export::ExportService;
use tagsync::import::ImportService;
use tagsync::store::{FileTagStore, FsTreeStore, InstallRoot, TagStore, TreeStore};
use tagsync::tree::{TagPath, TreeNode};
use tagsync::types::{CollisionPolicy, ExportMode};
use tempfile::TempDir;

struct Gateway {
    temp: TempDir,
    tags: Arc<FileTagStore>,
}

impl Gateway {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        write_provider(temp.path(), "default", &sample_provider());
        let tags = Arc::new(FileTagStore::new(temp.path().join("data/tag-snapshots")));
        Self { temp, tags }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn exporter(&self) -> ExportService {
        ExportService::new(
            self.tags.clone(),
            Arc::new(FsTreeStore::new()),
            InstallRoot::new(self.root()),
        )
    }

    fn importer(&self) -> ImportService {
        ImportService::new(
            self.tags.clone(),
            Arc::new(FsTreeStore::new()),
            InstallRoot::new(self.root()),
        )
    }

    fn fetch(&self, path: &str) -> TreeNode {
        self.tags.fetch("default", &TagPath::parse(path)).unwrap()
    }
}

fn canonical(mut nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    for node in &mut nodes {
        if let Some(children) = node.children.take() {
            node.children = Some(canonical(children));
        }
    }
    nodes
}

#[test]
fn test_roundtrip_per_layout() {
    for (mode, source) in [
        (ExportMode::SingleFile, "exports/area1.json"),
        (ExportMode::IndividualFiles, "exports/area1-items"),
        (ExportMode::StructuredByType, "exports/area1-typed"),
    ] {
        let gw = Gateway::new();
        let before = gw.fetch("Area1").children.unwrap_or_default();
        let mut target = ExportTarget::new("default", "Area1", source, mode);
        gw.exporter().export_tags(&target, false).unwrap();

        assert!(gw.tags.delete("default", &TagPath::parse("Area1")).unwrap());

        target.collision_policy = CollisionPolicy::Abort;
        let report = gw.importer().import_from_source(&target).unwrap();
        assert_eq!(report.summary.created, 3, "layout {}", mode);

        let after = gw.fetch("Area1").children.unwrap_or_default();
        assert_eq!(canonical(after), canonical(before), "layout {}", mode);
    }
}

#[test]
fn test_root_roundtrip_keeps_definitions_in_dependency_order() {
    let gw = Gateway::new();
    let target = ExportTarget::new("default", "", "exports/all.json", ExportMode::SingleFile);
    gw.exporter().export_tags(&target, false).unwrap();
    gw.tags.delete("default", &TagPath::root()).unwrap();

    gw.importer().import_from_source(&target).unwrap();

    let types = gw.fetch("_types_");
    assert_eq!(names(types.children()), vec!["Motor", "Pump"]);
    assert_eq!(names(gw.fetch("").children()), vec!["_types_", "Area1", "Area2"]);
}

#[test]
fn test_abort_refuses_populated_base() {
    let gw = Gateway::new();
    let mut target =
        ExportTarget::new("default", "Area2", "exports/area2.json", ExportMode::SingleFile);
    gw.exporter().export_tags(&target, false).unwrap();

    target.collision_policy = CollisionPolicy::Abort;
    let err = gw.importer().import_from_source(&target).unwrap_err();
    assert!(matches!(err, ApiError::ImportRejected(ref m) if m.contains("already exist")));
}

#[test]
fn test_merge_applies_edited_export() {
    let gw = Gateway::new();
    let mut target =
        ExportTarget::new("default", "Area1", "exports/area1.json", ExportMode::SingleFile);
    gw.exporter().export_tags(&target, false).unwrap();

    // Edit the exported file: change Speed and drop everything else.
    let file = gw.root().join("exports/area1.json");
    let store = FsTreeStore::new();
    let mut doc = store.read(&file).unwrap().unwrap();
    doc.tags = Some(vec![TreeNode::atomic("Speed").with_property("value", json!(7))]);
    store.write(&file, &doc).unwrap();

    target.collision_policy = CollisionPolicy::Merge;
    let report = gw.importer().import_from_source(&target).unwrap();
    assert_eq!(report.summary.merged, 1);

    let area = gw.fetch("Area1");
    assert_eq!(names(area.children()), vec!["Speed", "P1", "Line1"]);
    assert_eq!(area.children()[0].properties["value"], json!(7));
}

#[test]
fn test_delete_and_replace_drops_unexported_siblings() {
    let gw = Gateway::new();
    let mut target = ExportTarget::new(
        "default",
        "Area1/Line1",
        "exports/line1",
        ExportMode::StructuredByType,
    );
    gw.exporter().export_tags(&target, false).unwrap();
    std::fs::remove_file(gw.root().join("exports/line1/udts.json")).unwrap();

    target.collision_policy = CollisionPolicy::DeleteAndReplace;
    let report = gw.importer().import_from_source(&target).unwrap();
    assert_eq!(report.summary.deleted, 2);
    assert_eq!(report.summary.created, 1);
    assert_eq!(names(gw.fetch("Area1/Line1").children()), vec!["Count"]);
}

#[test]
fn test_import_from_config_reports_each_target() {
    let gw = Gateway::new();
    let exported =
        ExportTarget::new("default", "Area2", "exports/area2", ExportMode::IndividualFiles);
    gw.exporter().export_tags(&exported, false).unwrap();

    let config = ExportConfig::new(vec![
        exported,
        ExportTarget::new("default", "Area3", "exports/never-written", ExportMode::IndividualFiles),
    ]);
    let config_path = gw.root().join("data/tag-cicd/export-config.json");
    config.save(&config_path).unwrap();

    let results = gw.importer().import_from_config(&config_path, None).unwrap();
    assert_eq!(
        results["exports/area2"].message(),
        "Imported successfully: 0 created, 1 replaced, 0 merged, 0 skipped, 0 deleted"
    );
    assert!(!results["exports/never-written"].is_success());
    assert!(results["exports/never-written"].message().contains("No tags found"));
}
