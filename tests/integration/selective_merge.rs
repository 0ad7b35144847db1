//! Selective merge scenarios across layouts

use crate::integration::test_utils::names;
use serde_json::json;
use tagsync::error::TreeError;
use tagsync::merge::{merge_selective, target_location, ExportPathSpec, PATH_PROPERTY};
use tagsync::tree::{Replacement, TagDocument, TagKind, TagPath, TreeNode};
use tagsync::types::{ExportMode, TargetMatch};
use std::path::{Path, PathBuf};

fn consolidated(selected: &str, base: &str) -> ExportPathSpec {
    ExportPathSpec::new(
        TagPath::parse(selected),
        ExportMode::SingleFile,
        TagPath::parse(base),
    )
}

fn existing_provider() -> TagDocument {
    let mut doc = TagDocument::with_tags(vec![
        TreeNode::folder("Area1").with_children(vec![
            TreeNode::atomic("Speed").with_property("value", json!(1)),
            TreeNode::folder("Line1").with_children(vec![TreeNode::atomic("Count")]),
        ]),
        TreeNode::folder("Area2").with_children(vec![TreeNode::atomic("Level")]),
    ]);
    doc.name = Some(String::new());
    doc.kind = Some(TagKind::Provider);
    doc
}

#[test]
fn test_whole_root_replace() {
    let replacement = Replacement::container(vec![TreeNode::atomic("X"), TreeNode::atomic("Y")]);
    let merged =
        merge_selective(&existing_provider(), &replacement, &consolidated("", "")).unwrap();

    assert_eq!(merged.tags(), replacement.nodes.as_slice());
    assert_eq!(merged.name.as_deref(), Some(""));
    assert_eq!(merged.kind, Some(TagKind::Provider));
}

#[test]
fn test_missing_path_builds_folders_around_single_item() {
    let merged = merge_selective(
        &TagDocument::default(),
        &Replacement::single(TreeNode::atomic("Motor")),
        &consolidated("Area1/Line1/Motor", ""),
    )
    .unwrap();

    assert_eq!(names(merged.tags()), vec!["Area1"]);
    let area = &merged.tags()[0];
    assert_eq!(area.kind, TagKind::Folder);
    assert_eq!(area.children().len(), 1);
    let line = &area.children()[0];
    assert_eq!(line.name, "Line1");
    assert_eq!(line.children().len(), 1);
    assert_eq!(line.children()[0].name, "Motor");
    assert_eq!(line.children()[0].kind, TagKind::AtomicTag);
}

#[test]
fn test_sibling_replace_not_duplicate() {
    let spec = consolidated("Area1/Speed", "");
    let first = merge_selective(
        &existing_provider(),
        &Replacement::single(TreeNode::atomic("Speed").with_property("value", json!(2))),
        &spec,
    )
    .unwrap();
    let second = merge_selective(
        &first,
        &Replacement::single(TreeNode::atomic("Speed").with_property("value", json!(3))),
        &spec,
    )
    .unwrap();

    let area = &second.tags()[0];
    let speeds: Vec<&TreeNode> = area.children().iter().filter(|n| n.name == "Speed").collect();
    assert_eq!(speeds.len(), 1);
    assert_eq!(speeds[0].properties["value"], json!(3));
    assert_eq!(names(area.children()), vec!["Speed", "Line1"]);
}

#[test]
fn test_folder_selection_replaces_children_only() {
    let merged = merge_selective(
        &existing_provider(),
        &Replacement::container(vec![TreeNode::atomic("Fresh")]),
        &consolidated("Area1/Line1", ""),
    )
    .unwrap();

    let area = &merged.tags()[0];
    assert_eq!(names(area.children()), vec!["Speed", "Line1"]);
    assert_eq!(names(area.children()[1].children()), vec!["Fresh"]);
    assert_eq!(names(merged.tags()[1].children()), vec!["Level"]);
}

#[test]
fn test_structure_conflict_leaves_existing_untouched() {
    let existing = existing_provider();
    let before = existing.clone();
    let err = merge_selective(
        &existing,
        &Replacement::single(TreeNode::atomic("Deep")),
        &consolidated("Area1/Speed/Deep", ""),
    )
    .unwrap_err();

    assert!(matches!(err, TreeError::StructureConflict { ref segment, .. } if segment == "Speed"));
    assert_eq!(existing, before);
}

#[test]
fn test_base_target_file_is_named_after_base() {
    let mut existing =
        TagDocument::with_tags(vec![TreeNode::atomic("Old"), TreeNode::atomic("Keep")]);
    existing.name = Some("Whatever".to_string());
    existing.kind = Some(TagKind::Provider);

    let merged = merge_selective(
        &existing,
        &Replacement::single(TreeNode::atomic("Old").with_property("v", json!(true))),
        &consolidated("Area1/Old", "Area1"),
    )
    .unwrap();

    assert_eq!(merged.name.as_deref(), Some("Area1"));
    assert_eq!(merged.kind, Some(TagKind::Folder));
    assert_eq!(names(merged.tags()), vec!["Old", "Keep"]);
    assert_eq!(merged.tags()[0].properties["v"], json!(true));
}

#[test]
fn test_fresh_file_for_base_selection_takes_content_directly() {
    let merged = merge_selective(
        &TagDocument::default(),
        &Replacement::container(vec![TreeNode::atomic("A")]),
        &consolidated("Area1/Line1", "Area1/Line1"),
    )
    .unwrap();
    assert_eq!(names(merged.tags()), vec!["A"]);
    assert_eq!(merged.name.as_deref(), Some("Line1"));
}

#[test]
fn test_last_segment_match_treats_same_named_root_as_target() {
    let mut existing = TagDocument::with_tags(vec![TreeNode::atomic("Stale")]);
    existing.name = Some("Line1".to_string());

    // Legacy matching: the loaded root shares the selection's last name.
    let legacy = consolidated("Area1/Line1", "")
        .with_target_match(TargetMatch::LastSegment);
    let merged = merge_selective(
        &existing,
        &Replacement::container(vec![TreeNode::atomic("Fresh")]),
        &legacy,
    )
    .unwrap();
    assert_eq!(names(merged.tags()), vec!["Fresh"]);

    // Full-path matching builds the path instead.
    let merged = merge_selective(
        &existing,
        &Replacement::container(vec![TreeNode::atomic("Fresh")]),
        &consolidated("Area1/Line1", ""),
    )
    .unwrap();
    assert_eq!(names(merged.tags()), vec!["Stale", "Area1"]);
}

fn pathed(node: TreeNode, path: &str) -> TreeNode {
    node.with_property(PATH_PROPERTY, json!(path))
}

#[test]
fn test_flat_list_path_filter() {
    let existing = TagDocument {
        tags: Some(vec![
            pathed(TreeNode::atomic("Speed"), "Area1/Speed"),
            pathed(TreeNode::atomic("Count"), "Area1/Line1/Count"),
            pathed(TreeNode::atomic("Speed"), "Area10/Speed"),
            pathed(TreeNode::atomic("Level"), "Area2/Level"),
        ]),
        udts: Some(vec![pathed(TreeNode::udt_instance("M1", "Motor"), "Area1/M1")]),
        ..TagDocument::default()
    };
    let spec = ExportPathSpec::new(
        TagPath::parse("Area1"),
        ExportMode::StructuredByType,
        TagPath::root(),
    );
    let replacement = Replacement::container(vec![
        TreeNode::atomic("Temp"),
        TreeNode::udt_instance("M2", "Motor"),
    ]);

    let merged = merge_selective(&existing, &replacement, &spec).unwrap();

    let tag_paths: Vec<&str> = merged
        .tags()
        .iter()
        .map(|n| n.properties[PATH_PROPERTY].as_str().unwrap())
        .collect();
    assert_eq!(tag_paths, vec!["Area10/Speed", "Area2/Level", "Area1/Temp"]);
    let udt_paths: Vec<&str> = merged
        .udts()
        .iter()
        .map(|n| n.properties[PATH_PROPERTY].as_str().unwrap())
        .collect();
    assert_eq!(udt_paths, vec!["Area1/M2"]);
}

#[test]
fn test_per_item_layout_is_path_arithmetic() {
    let spec = ExportPathSpec::new(
        TagPath::parse("Area1/Line1/Motor"),
        ExportMode::IndividualFiles,
        TagPath::parse("Area1"),
    );
    let node = TreeNode::udt_instance("Motor", "Motor");
    let doc = merge_selective(
        &TagDocument::default(),
        &Replacement::single(node.clone()),
        &spec,
    )
    .unwrap();
    assert_eq!(doc.into_node(), node);

    assert_eq!(
        target_location(Path::new("/exports/area1"), &spec.selected, &spec.base),
        PathBuf::from("/exports/area1/Line1/Motor")
    );
}
