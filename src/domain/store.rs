//! The canonical id → node map and its query surface.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Node, NodeId};
use crate::domain::schema::FieldSchema;
use crate::domain::view::{FlatEntry, ViewNode, ViewOptions};
use crate::domain::{flat, nested, nested_set, selection, view};

/// Plain export of a store, suitable for caching.
///
/// Nodes are kept as a list in store order; ids live inside each node so
/// that integer ids survive formats whose map keys must be strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
}

/// Insertion-ordered map from id to node, stored in depth-first pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStore {
    nodes: IndexMap<NodeId, Node>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from flat records carrying parent references.
    pub fn load_flat(records: &[Value], schema: &FieldSchema) -> TreeResult<Self> {
        let mut store = Self::new();
        store.replace_flat(records, schema)?;
        Ok(store)
    }

    /// Builds a store from nested records.
    pub fn load_nested(records: &[Value], schema: &FieldSchema) -> TreeResult<Self> {
        let mut store = Self::new();
        store.replace_nested(records, schema)?;
        Ok(store)
    }

    /// Replaces the contents with a fresh flat build; on error the store is unchanged.
    #[instrument(level = "debug", skip(self, records, schema))]
    pub fn replace_flat(&mut self, records: &[Value], schema: &FieldSchema) -> TreeResult<()> {
        self.nodes = flat::build(records, schema)?;
        info!("loaded {} nodes from flat records", self.nodes.len());
        Ok(())
    }

    /// Replaces the contents with a fresh nested build; on error the store is unchanged.
    #[instrument(level = "debug", skip(self, records, schema))]
    pub fn replace_nested(&mut self, records: &[Value], schema: &FieldSchema) -> TreeResult<()> {
        self.nodes = nested::build(records, schema)?;
        info!("loaded {} nodes from nested records", self.nodes.len());
        Ok(())
    }

    pub fn export(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.values().cloned().collect(),
        }
    }

    /// Loads a snapshot verbatim. The snapshot is trusted, not re-validated.
    pub fn restore(snapshot: Snapshot) -> Self {
        debug!("restoring {} nodes from snapshot", snapshot.nodes.len());
        Self {
            nodes: snapshot.nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_root())
    }

    pub fn breadcrumb_of(&self, id: &NodeId) -> TreeResult<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|n| n.breadcrumbs.as_slice())
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    pub fn is_selected(&self, id: &NodeId, reference: &NodeId) -> bool {
        selection::is_selected(&self.nodes, id, reference)
    }

    pub fn is_visible(&self, id: &NodeId, reference: Option<&NodeId>, start: Option<&NodeId>) -> bool {
        selection::is_visible(&self.nodes, id, reference, start)
    }

    pub fn flat_view(&self, options: &ViewOptions) -> Vec<FlatEntry> {
        view::flat_view(&self.nodes, options)
    }

    pub fn nested_view(&self, options: &ViewOptions) -> Vec<ViewNode> {
        view::build_view(&self.nodes, options)
    }

    pub fn children_of(&self, id: &NodeId, options: &ViewOptions) -> TreeResult<Vec<ViewNode>> {
        view::children_of(&self.nodes, id, options)
    }

    /// Recomputes nested-set bounds in place.
    pub fn recompute_nested_set(&mut self) {
        nested_set::apply(&mut self.nodes);
    }
}

impl<'a> IntoIterator for &'a TreeStore {
    type Item = &'a Node;
    type IntoIter = indexmap::map::Values<'a, NodeId, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}
