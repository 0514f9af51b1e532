//! Root-to-self ancestor paths.

use indexmap::IndexMap;
use tracing::instrument;

use crate::domain::node::{Node, NodeId};

/// Ancestor path of `id`, outermost first, self included.
///
/// The walk stops at the first parent the map cannot resolve, and the
/// `origin` id is left out wherever it appears.
pub fn breadcrumb(nodes: &IndexMap<NodeId, Node>, id: &NodeId, origin: Option<&NodeId>) -> Vec<NodeId> {
    let mut crumbs = Vec::new();
    let mut current = nodes.get(id);
    // bounded by the map size so a corrupt restored map cannot loop forever
    let mut remaining = nodes.len();
    while let Some(node) = current {
        if remaining == 0 {
            break;
        }
        remaining -= 1;
        if origin != Some(&node.id) {
            crumbs.push(node.id.clone());
        }
        current = node.parent.as_ref().and_then(|p| nodes.get(p));
    }
    crumbs.reverse();
    crumbs
}

/// Recomputes the breadcrumbs of every node.
#[instrument(level = "debug", skip(nodes), fields(nodes = nodes.len()))]
pub fn apply(nodes: &mut IndexMap<NodeId, Node>, origin: Option<&NodeId>) {
    let crumbs: Vec<Vec<NodeId>> = nodes.keys().map(|id| breadcrumb(nodes, id, origin)).collect();
    for (node, path) in nodes.values_mut().zip(crumbs) {
        node.breadcrumbs = path;
    }
}
