//! Object-graph fallback walker.
//!
//! Last resort, used only when the hooks attached too late and no live
//! capture fired. The adapter serializes the retained UI-component tree
//! it could still reach; this walker hunts that tree for embedded core
//! options. All traversal is hard-bounded to stay safe on pathological
//! trees.

use serde_json::{Map, Value};
use tracing::debug;

use crate::known::{ConfigField, MOUNT_MARKER_CLASS};
use crate::snapshot::{CallbackOrigin, CapturedFragment, Provenance};
use crate::trace::UiNode;

/// Maximum total nodes visited across the whole walk.
pub const MAX_SCANNED_NODES: usize = 4096;
/// Maximum mount points whose options are collected.
pub const MAX_MOUNT_POINTS: usize = 8;
/// Maximum upward hops from a marker element to its component ancestor.
pub const MAX_UPWARD_HOPS: usize = 12;

/// Search the retained tree for embedded configuration.
///
/// Start elements are nodes whose class attribute contains the mount
/// marker substring (isolated sub-trees included). Each start walks up
/// to the nearest ancestor carrying retained-component metadata, whose
/// subtree is then searched for a node exposing core options. Options
/// from multiple mount points merge first-non-missing-wins.
pub fn walk_fallback(root: &UiNode) -> Option<CapturedFragment> {
    let arena = Arena::build(root);
    let mut budget = MAX_SCANNED_NODES.saturating_sub(arena.nodes.len());

    let mut seen_ancestors: Vec<usize> = Vec::new();
    let mut collected: Vec<Map<String, Value>> = Vec::new();

    for start in arena.marker_indices() {
        if collected.len() >= MAX_MOUNT_POINTS {
            debug!("mount point limit reached, stopping walk");
            break;
        }
        let Some(ancestor) = arena.component_ancestor(start) else {
            continue;
        };
        if seen_ancestors.contains(&ancestor) {
            continue;
        }
        seen_ancestors.push(ancestor);

        if let Some(options) = find_core_options(arena.nodes[ancestor], &mut budget) {
            collected.push(options.clone());
        }
    }

    merge_mount_options(&collected)
}

/// First-non-missing-wins merge across discovered mount points.
fn merge_mount_options(collected: &[Map<String, Value>]) -> Option<CapturedFragment> {
    let mut fragment = CapturedFragment::new(Provenance::Primary, CallbackOrigin::TopLevel);
    for options in collected {
        for (key, value) in options {
            if let Some(field) = ConfigField::from_key(key) {
                if !fragment.fields.contains_key(&field) {
                    fragment.insert(field, value.clone());
                }
            }
        }
    }
    if fragment.is_empty() { None } else { Some(fragment) }
}

/// Depth-first search of a subtree (isolated sub-trees included) for
/// the first node exposing an object-shaped core options property.
fn find_core_options<'a>(node: &'a UiNode, budget: &mut usize) -> Option<&'a Map<String, Value>> {
    if *budget == 0 {
        debug!("node budget exhausted during downward search");
        return None;
    }
    *budget -= 1;

    if let Some(options) = node.core_options.as_ref().and_then(Value::as_object) {
        return Some(options);
    }
    node.children
        .iter()
        .chain(node.shadow_children.iter())
        .find_map(|child| find_core_options(child, budget))
}

/// Flattened view of the tree with parent links, capped at
/// `MAX_SCANNED_NODES` during construction.
struct Arena<'a> {
    nodes: Vec<&'a UiNode>,
    parents: Vec<Option<usize>>,
}

impl<'a> Arena<'a> {
    fn build(root: &'a UiNode) -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            parents: Vec::new(),
        };
        let mut stack: Vec<(&'a UiNode, Option<usize>)> = vec![(root, None)];
        while let Some((node, parent)) = stack.pop() {
            if arena.nodes.len() >= MAX_SCANNED_NODES {
                debug!("node limit reached while flattening tree");
                break;
            }
            let idx = arena.nodes.len();
            arena.nodes.push(node);
            arena.parents.push(parent);
            // Reverse push keeps document order across the LIFO stack.
            for child in node.children.iter().chain(node.shadow_children.iter()).rev() {
                stack.push((child, Some(idx)));
            }
        }
        arena
    }

    fn marker_indices(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].class.contains(MOUNT_MARKER_CLASS))
            .collect()
    }

    /// Nearest ancestor (or self) with retained-component metadata,
    /// within the hop bound.
    fn component_ancestor(&self, start: usize) -> Option<usize> {
        let mut current = Some(start);
        for _ in 0..=MAX_UPWARD_HOPS {
            let idx = current?;
            if self.nodes[idx].component_meta {
                return Some(idx);
            }
            current = self.parents[idx];
        }
        None
    }
}
