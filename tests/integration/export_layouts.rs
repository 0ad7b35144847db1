//! Full export per layout, read-back, and batch export from a target collection

use crate::integration::test_utils::{names, read_doc, sample_provider, write_provider};
use std::path::Path;
use std::sync::Arc;
use tagsync::config::{ExportConfig, ExportTarget};
use tagsync::export::ExportService;
use tagsync::layout::read_back;
use tagsync::store::{FileTagStore, FsTreeStore, InstallRoot};
use tagsync::tree::sorter::order_sequence;
use tagsync::tree::{TagKind, TagPath, TreeNode};
use tagsync::types::{ExportMode, TargetResult};
use tempfile::TempDir;

fn service(root: &Path) -> ExportService {
    ExportService::new(
        Arc::new(FileTagStore::new(root.join("data/tag-snapshots"))),
        Arc::new(FsTreeStore::new()),
        InstallRoot::new(root),
    )
}

/// Siblings sorted by name at every level, for layout-independent comparison.
fn canonical(mut nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    for node in &mut nodes {
        if let Some(children) = node.children.take() {
            node.children = Some(canonical(children));
        }
    }
    nodes
}

fn exported_children() -> Vec<TreeNode> {
    sample_provider().into_node().children.unwrap_or_default()
}

#[test]
fn test_every_layout_reads_back_to_the_snapshot() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let svc = service(temp.path());

    for (mode, source) in [
        (ExportMode::SingleFile, "exports/all.json"),
        (ExportMode::IndividualFiles, "exports/items"),
        (ExportMode::StructuredByType, "exports/by-type"),
    ] {
        let target = ExportTarget::new("default", "", source, mode);
        let export = svc.export_tags(&target, false).unwrap();
        assert!(export.files_written > 0);

        let back = read_back(&FsTreeStore::new(), mode, &temp.path().join(source)).unwrap();
        assert_eq!(canonical(back), canonical(exported_children()), "layout {}", mode);
    }
}

#[test]
fn test_single_file_output_shape() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let target = ExportTarget::new("default", "", "exports/all.json", ExportMode::SingleFile);
    service(temp.path()).export_tags(&target, false).unwrap();

    let doc = read_doc(&temp.path().join("exports/all.json"));
    assert_eq!(doc.name.as_deref(), Some(""));
    assert_eq!(doc.kind, Some(TagKind::Provider));

    let mut expected = exported_children();
    order_sequence(&mut expected).unwrap();
    assert_eq!(doc.tags(), expected.as_slice());
}

#[test]
fn test_structured_files_are_tags_documents() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let target =
        ExportTarget::new("default", "Area1", "exports/area1", ExportMode::StructuredByType);
    service(temp.path()).export_tags(&target, false).unwrap();

    let raw = std::fs::read_to_string(temp.path().join("exports/area1/udts.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 1);
    assert_eq!(value["tags"][0]["typeId"], "Pump");

    let line = read_doc(&temp.path().join("exports/area1/Line1/tags.json"));
    assert_eq!(names(line.tags()), vec!["Count"]);
    let line_udts = read_doc(&temp.path().join("exports/area1/Line1/udts.json"));
    assert_eq!(names(line_udts.tags()), vec!["Motor"]);
}

#[test]
fn test_batch_export_reports_per_target() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let config = ExportConfig::new(vec![
        ExportTarget::new("default", "", "exports/all.json", ExportMode::SingleFile),
        ExportTarget::new("default", "Area1", "exports/area1", ExportMode::IndividualFiles),
        ExportTarget::new("default", "Area2", "exports/area2", ExportMode::StructuredByType),
        ExportTarget::new("default", "Nowhere", "exports/nowhere.json", ExportMode::SingleFile),
    ]);
    let config_path = temp.path().join("data/tag-cicd/export-config.json");
    config.save(&config_path).unwrap();

    let results = service(temp.path())
        .export_from_config(&config_path, false)
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(
        results["exports/area1"],
        TargetResult::Success("Exported successfully using Individual Files mode".to_string())
    );
    assert_eq!(
        results["exports/area2"],
        TargetResult::Success("Exported successfully using Structured By Type mode".to_string())
    );
    assert!(results["exports/all.json"].is_success());
    assert!(!results["exports/nowhere.json"].is_success());
    assert!(temp.path().join("exports/area2/tags.json").exists());
}

#[test]
fn test_concurrent_selective_exports_to_one_file_serialize() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let svc = service(temp.path());
    let target = temp.path().join("exports/all.json");

    let paths = ["Area1/Speed", "Area1/Line1", "Area2", "Area1/P1", "Area2/Level"];
    std::thread::scope(|scope| {
        for path in paths {
            let svc = &svc;
            let target = &target;
            scope.spawn(move || {
                let outcome = svc.perform_selective_export(
                    "default",
                    &TagPath::parse(path),
                    target,
                    ExportMode::SingleFile,
                    false,
                    &TagPath::root(),
                );
                assert!(outcome.success, "{:?}", outcome.error);
            });
        }
    });

    let doc = read_doc(&target);
    let mut top = names(doc.tags());
    top.sort();
    assert_eq!(top, vec!["Area1", "Area2"]);
    let area1 = doc.tags().iter().find(|n| n.name == "Area1").unwrap();
    let mut children = names(area1.children());
    children.sort();
    assert_eq!(children, vec!["Line1", "P1", "Speed"]);
}
