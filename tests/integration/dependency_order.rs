//! UDT definition ordering, standalone and through exports

use crate::integration::test_utils::{names, read_doc, sample_provider, write_provider};
use std::sync::Arc;
use tagsync::config::ExportTarget;
use tagsync::error::TreeError;
use tagsync::export::ExportService;
use tagsync::store::{FileTagStore, FsTreeStore, InstallRoot};
use tagsync::tree::sorter::{order_sequence, sort_definitions};
use tagsync::tree::TreeNode;
use tagsync::types::ExportMode;
use tempfile::TempDir;

fn def(name: &str, uses: &[&str]) -> TreeNode {
    TreeNode::udt_definition(name).with_children(
        uses.iter()
            .map(|t| TreeNode::udt_instance(format!("{}1", t), *t))
            .collect(),
    )
}

#[test]
fn test_referenced_definition_comes_first() {
    let sorted = sort_definitions(vec![def("Pump", &["Motor"]), def("Motor", &[])]).unwrap();
    assert_eq!(names(&sorted), vec!["Motor", "Pump"]);
}

#[test]
fn test_chain_and_diamond() {
    let sorted = sort_definitions(vec![
        def("Station", &["Pump", "Valve"]),
        def("Pump", &["Motor"]),
        def("Valve", &["Motor"]),
        def("Motor", &[]),
    ])
    .unwrap();
    assert_eq!(names(&sorted), vec!["Motor", "Pump", "Valve", "Station"]);
}

#[test]
fn test_deeply_nested_instance_counts_as_dependency() {
    let skid = TreeNode::udt_definition("Skid").with_children(vec![TreeNode::folder("Drives")
        .with_children(vec![TreeNode::udt_instance("M", "Motor")])]);
    let sorted = sort_definitions(vec![skid, def("Motor", &[])]).unwrap();
    assert_eq!(names(&sorted), vec!["Motor", "Skid"]);
}

#[test]
fn test_unresolvable_type_ref_does_not_block() {
    let sorted = sort_definitions(vec![def("Pump", &["Vendor/Motor"]), def("Tank", &[])]).unwrap();
    assert_eq!(names(&sorted), vec!["Pump", "Tank"]);
}

#[test]
fn test_cycle_is_reported() {
    let err = sort_definitions(vec![def("A", &["B"]), def("B", &["A"])]).unwrap_err();
    match err {
        TreeError::DependencyCycle { cycle } => {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&"A".to_string()) && cycle.contains(&"B".to_string()));
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_order_sequence_keeps_non_definitions_after() {
    let mut seq = vec![
        TreeNode::atomic("Note"),
        def("Pump", &["Motor"]),
        TreeNode::folder("Sub"),
        def("Motor", &[]),
    ];
    order_sequence(&mut seq).unwrap();
    assert_eq!(names(&seq), vec!["Motor", "Pump", "Note", "Sub"]);
}

#[test]
fn test_structured_export_writes_types_in_dependency_order() {
    let temp = TempDir::new().unwrap();
    write_provider(temp.path(), "default", &sample_provider());
    let service = ExportService::new(
        Arc::new(FileTagStore::new(temp.path().join("data/tag-snapshots"))),
        Arc::new(FsTreeStore::new()),
        InstallRoot::new(temp.path()),
    );

    let target = ExportTarget::new("default", "", "exports/by-type", ExportMode::StructuredByType);
    service.export_tags(&target, false).unwrap();

    let types = read_doc(&temp.path().join("exports/by-type/_types_/udts.json"));
    assert_eq!(names(types.tags()), vec!["Motor", "Pump"]);
}
