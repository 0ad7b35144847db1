//! Dependency ordering for UDT definitions.
//!
//! A definition that nests an instance of another definition (at any depth) must be
//! serialized after that definition, otherwise an importer meets the instance before its
//! type exists. Ordering is a depth-first placement: to place a definition, first place
//! every definition its nested instances reference, then append it.
//!
//! Cycles (including a definition that instantiates itself) are reported as
//! [`TreeError::DependencyCycle`] instead of recursing forever.

use crate::error::TreeError;
use crate::tree::node::{TagKind, TreeNode};
use crate::tree::walker::nested_instances;
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Placed,
}

/// Order `definitions` so that every referenced definition precedes its referrer.
///
/// Definitions without dependencies keep their first-encounter order. `typeId` values that
/// name no definition in this collection are ignored.
#[instrument(skip_all, fields(count = definitions.len()))]
pub fn sort_definitions(definitions: Vec<TreeNode>) -> Result<Vec<TreeNode>, TreeError> {
    let order = placement_order(&definitions)?;
    let mut slots: Vec<Option<TreeNode>> = definitions.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Indices of `definitions` in dependency order.
pub fn placement_order(definitions: &[TreeNode]) -> Result<Vec<usize>, TreeError> {
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (i, def) in definitions.iter().enumerate() {
        by_name.entry(def.name.as_str()).or_insert(i);
    }

    let dependencies: Vec<Vec<usize>> = definitions
        .iter()
        .map(|def| {
            nested_instances(def)
                .into_iter()
                .filter_map(|inst| inst.type_ref.as_deref())
                .filter_map(|type_ref| by_name.get(type_ref).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; definitions.len()];
    let mut order = Vec::with_capacity(definitions.len());
    let mut trail = Vec::new();

    for i in 0..definitions.len() {
        place(i, definitions, &dependencies, &mut marks, &mut trail, &mut order)?;
    }

    debug!(placed = order.len(), "Ordered UDT definitions");
    Ok(order)
}

fn place(
    i: usize,
    definitions: &[TreeNode],
    dependencies: &[Vec<usize>],
    marks: &mut [Mark],
    trail: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<(), TreeError> {
    match marks[i] {
        Mark::Placed => return Ok(()),
        Mark::Visiting => {
            let start = trail.iter().position(|&t| t == i).unwrap_or(0);
            let mut cycle: Vec<String> = trail[start..]
                .iter()
                .map(|&t| definitions[t].name.clone())
                .collect();
            cycle.push(definitions[i].name.clone());
            return Err(TreeError::DependencyCycle { cycle });
        }
        Mark::Unvisited => {}
    }

    marks[i] = Mark::Visiting;
    trail.push(i);
    for &dep in &dependencies[i] {
        place(dep, definitions, dependencies, marks, trail, order)?;
    }
    trail.pop();
    marks[i] = Mark::Placed;
    order.push(i);
    Ok(())
}

/// Reorder every sibling sequence under `node` that holds UDT definitions: definitions
/// first, in dependency order, then the remaining siblings in their original order.
pub fn order_definitions(node: &mut TreeNode) -> Result<(), TreeError> {
    if let Some(children) = node.children.as_mut() {
        order_sequence(children)?;
    }
    Ok(())
}

/// Same as [`order_definitions`] for a bare sibling sequence.
pub fn order_sequence(children: &mut Vec<TreeNode>) -> Result<(), TreeError> {
    for child in children.iter_mut() {
        order_definitions(child)?;
    }

    if !children.iter().any(|c| c.kind == TagKind::UdtDefinition) {
        return Ok(());
    }

    let (definitions, rest): (Vec<TreeNode>, Vec<TreeNode>) = std::mem::take(children)
        .into_iter()
        .partition(|c| c.kind == TagKind::UdtDefinition);
    let mut ordered = sort_definitions(definitions)?;
    ordered.extend(rest);
    *children = ordered;
    Ok(())
}
