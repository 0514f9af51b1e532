//! Nested-set (left/right) numbering.

use indexmap::IndexMap;
use tracing::instrument;

use crate::domain::node::{Node, NodeId};
use crate::domain::view::{build_view, ViewNode, ViewOptions};

/// Numbers `node` starting at `left`; returns the next free counter value.
fn number(node: &ViewNode, left: u64, bounds: &mut Vec<(NodeId, u64, u64)>) -> u64 {
    let mut right = left + 1;
    for child in &node.children {
        right = number(child, right, bounds);
    }
    bounds.push((node.id().clone(), left, right));
    right + 1
}

/// Computes bounds for every node of the full forest, roots numbered consecutively from 1.
pub fn compute(nodes: &IndexMap<NodeId, Node>) -> Vec<(NodeId, u64, u64)> {
    let forest = build_view(nodes, &ViewOptions::default());
    let mut bounds = Vec::with_capacity(nodes.len());
    let mut counter = 1;
    for root in &forest {
        counter = number(root, counter, &mut bounds);
    }
    bounds
}

/// Recomputes and stores `left`/`right` on every node.
#[instrument(level = "debug", skip(nodes), fields(nodes = nodes.len()))]
pub fn apply(nodes: &mut IndexMap<NodeId, Node>) {
    for (id, left, right) in compute(nodes) {
        if let Some(node) = nodes.get_mut(&id) {
            node.left = Some(left);
            node.right = Some(right);
        }
    }
}
