//! Property-based tests for merge idempotence and definition ordering

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use std::collections::HashMap;
use tagsync::merge::{merge_selective, ExportPathSpec, PATH_PROPERTY};
use tagsync::tree::sorter::sort_definitions;
use tagsync::tree::{Replacement, TagDocument, TagKind, TagPath, TreeNode};
use tagsync::types::ExportMode;

/// Sibling level of folders (`F*`) and atomic tags (`t*`) with unique names.
fn level(depth: u32) -> BoxedStrategy<Vec<TreeNode>> {
    let atoms = prop::collection::btree_set("t[0-3]", 0..3);
    if depth == 0 {
        return atoms
            .prop_map(|names| names.into_iter().map(TreeNode::atomic).collect())
            .boxed();
    }
    (atoms, prop::collection::btree_map("F[0-3]", level(depth - 1), 0..3))
        .prop_map(|(atoms, folders)| {
            let mut nodes: Vec<TreeNode> = folders
                .into_iter()
                .map(|(name, children)| TreeNode::folder(name).with_children(children))
                .collect();
            nodes.extend(atoms.into_iter().map(TreeNode::atomic));
            nodes
        })
        .boxed()
}

fn provider_doc(tags: Vec<TreeNode>) -> TagDocument {
    let mut doc = TagDocument::with_tags(tags);
    doc.name = Some(String::new());
    doc.kind = Some(TagKind::Provider);
    doc
}

fn folder_path() -> impl Strategy<Value = TagPath> {
    prop::collection::vec("F[0-3]", 0..4).prop_map(TagPath::from_segments)
}

fn replacement() -> impl Strategy<Value = Replacement> {
    prop::collection::btree_set("n[0-3]", 0..3).prop_map(|names| {
        Replacement::container(names.into_iter().map(TreeNode::atomic).collect())
    })
}

/// Re-merging the same selection leaves a consolidated document unchanged.
#[test]
fn test_consolidated_merge_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(level(2), folder_path(), replacement()),
            |(tags, selected, replacement)| {
                let spec =
                    ExportPathSpec::new(selected.clone(), ExportMode::SingleFile, TagPath::root());
                let existing = provider_doc(tags);

                let once = merge_selective(&existing, &replacement, &spec);
                prop_assume!(once.is_ok());
                let once = once.unwrap();
                let twice = merge_selective(&once, &replacement, &spec).unwrap();
                prop_assert_eq!(&once, &twice);

                // Top-level siblings off the selected branch survive verbatim.
                if let Some(first) = selected.first() {
                    for node in existing.tags().iter().filter(|n| n.name != first) {
                        prop_assert!(once.tags().contains(node));
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Flat lists: re-merging the same selection is a no-op and nothing outside it is dropped.
#[test]
fn test_flat_merge_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let existing_paths = prop::collection::btree_set("(F[0-2]/){0,2}t[0-3]", 0..8);
    runner
        .run(
            &(existing_paths, folder_path(), replacement()),
            |(paths, selected, replacement)| {
                let tags = paths
                    .iter()
                    .map(|p| {
                        let path = TagPath::parse(p);
                        TreeNode::atomic(path.last().unwrap_or_default())
                            .with_property(PATH_PROPERTY, serde_json::json!(p))
                    })
                    .collect();
                let existing = TagDocument::with_tags(tags);
                let spec = ExportPathSpec::new(
                    selected.clone(),
                    ExportMode::StructuredByType,
                    TagPath::root(),
                );

                let once = merge_selective(&existing, &replacement, &spec).unwrap();
                let twice = merge_selective(&once, &replacement, &spec).unwrap();
                prop_assert_eq!(&once, &twice);

                let survivors = paths
                    .iter()
                    .filter(|p| !TagPath::parse(p).starts_with(&selected))
                    .count();
                prop_assert_eq!(once.tags().len(), survivors + replacement.nodes.len());
                Ok(())
            },
        )
        .unwrap();
}

/// Random acyclic dependency graphs in random declaration order always sort with every
/// referenced definition ahead of its referrer.
#[test]
fn test_definition_order_respects_dependencies() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let graph = (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
    });

    runner
        .run(&graph, |(edges, declaration_order)| {
            // Definition i may only use definitions j < i, which keeps the graph acyclic.
            let uses = |i: usize| -> Vec<usize> { (0..i).filter(|&j| edges[i][j]).collect() };
            let definitions: Vec<TreeNode> = declaration_order
                .iter()
                .map(|&i| {
                    TreeNode::udt_definition(format!("D{}", i)).with_children(
                        uses(i)
                            .into_iter()
                            .map(|j| TreeNode::udt_instance(format!("m{}", j), format!("D{}", j)))
                            .collect(),
                    )
                })
                .collect();

            let sorted = sort_definitions(definitions).unwrap();
            prop_assert_eq!(sorted.len(), declaration_order.len());

            let position: HashMap<String, usize> = sorted
                .iter()
                .enumerate()
                .map(|(pos, def)| (def.name.clone(), pos))
                .collect();
            for &i in &declaration_order {
                for j in uses(i) {
                    let used_pos = position[&format!("D{}", j)];
                    let user_pos = position[&format!("D{}", i)];
                    prop_assert!(used_pos < user_pos);
                }
            }
            Ok(())
        })
        .unwrap();
}
