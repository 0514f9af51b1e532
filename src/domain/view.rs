//! Flat and nested projections of the canonical map.
//!
//! Views copy nodes out of the map and annotate the copies with the
//! query-scoped `selected`/`visible` flags; the stored nodes are never touched.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{instrument, trace};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Node, NodeId, Record};
use crate::domain::schema::FieldSchema;
use crate::domain::selection;

/// Filters and selection state for a view query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Selected node ids; empty means no selection
    pub selection: Vec<NodeId>,
    /// Restrict the view to this node and its descendants
    pub start: Option<NodeId>,
    /// Deepest level included; `Some(0)` keeps only roots
    pub depth_limit: Option<usize>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, id: impl Into<NodeId>) -> Self {
        self.selection.push(id.into());
        self
    }

    pub fn start_at(mut self, id: impl Into<NodeId>) -> Self {
        self.start = Some(id.into());
        self
    }

    pub fn depth(mut self, limit: usize) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    fn admits(&self, node: &Node) -> bool {
        let in_branch = self
            .start
            .as_ref()
            .map_or(true, |start| node.breadcrumbs.contains(start));
        let in_depth = self.depth_limit.map_or(true, |limit| node.level <= limit);
        in_branch && in_depth
    }
}

/// A node copy annotated for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub node: Node,
    pub selected: bool,
    pub visible: bool,
}

impl FlatEntry {
    pub fn to_record(&self, schema: &FieldSchema) -> Record {
        let mut record = self.node.to_record(schema);
        record.insert(schema.selected.clone(), Value::Bool(self.selected));
        record.insert(schema.visible.clone(), Value::Bool(self.visible));
        record
    }
}

/// A node of a nested view, owning its children.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub node: Node,
    pub selected: bool,
    pub visible: bool,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    /// Number of nodes in this subtree, self included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ViewNode::size).sum::<usize>()
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(current.children.iter().rev());
        }
        out
    }

    pub fn to_record(&self, schema: &FieldSchema) -> Record {
        let mut record = self.node.to_record(schema);
        record.insert(schema.selected.clone(), Value::Bool(self.selected));
        record.insert(schema.visible.clone(), Value::Bool(self.visible));
        record.insert(
            schema.children.clone(),
            Value::Array(
                self.children
                    .iter()
                    .map(|c| Value::Object(c.to_record(schema)))
                    .collect(),
            ),
        );
        record
    }
}

fn annotate(nodes: &IndexMap<NodeId, Node>, node: &Node, options: &ViewOptions) -> FlatEntry {
    FlatEntry {
        node: node.clone(),
        selected: selection::is_selected_any(nodes, &node.id, &options.selection),
        visible: selection::is_visible_any(nodes, &node.id, &options.selection, options.start.as_ref()),
    }
}

/// Filtered, annotated nodes in store order.
#[instrument(level = "debug", skip(nodes))]
pub fn flat_view(nodes: &IndexMap<NodeId, Node>, options: &ViewOptions) -> Vec<FlatEntry> {
    nodes
        .values()
        .filter(|node| options.admits(node))
        .map(|node| annotate(nodes, node, options))
        .collect()
}

struct Slot {
    entry: FlatEntry,
    children: Vec<Index>,
}

fn materialize(arena: &mut Arena<Slot>, idx: Index) -> Option<ViewNode> {
    let slot = arena.remove(idx)?;
    let children = slot
        .children
        .into_iter()
        .filter_map(|child| materialize(arena, child))
        .collect();
    Some(ViewNode {
        node: slot.entry.node,
        selected: slot.entry.selected,
        visible: slot.entry.visible,
        children,
    })
}

/// Rebuilds the nested forest from the pre-ordered map.
///
/// A level-keyed stack holds the open ancestor chain: entries at or below
/// the current level are closed, then the node becomes a root (empty stack)
/// or a child of the stack top.
#[instrument(level = "debug", skip(nodes))]
pub fn build_view(nodes: &IndexMap<NodeId, Node>, options: &ViewOptions) -> Vec<ViewNode> {
    let mut arena: Arena<Slot> = Arena::with_capacity(nodes.len());
    let mut roots: Vec<Index> = Vec::new();
    let mut stack: Vec<(usize, Index)> = Vec::new();

    for entry in flat_view(nodes, options) {
        let level = entry.node.level;
        while stack.last().is_some_and(|&(open, _)| open >= level) {
            stack.pop();
        }
        let idx = arena.insert(Slot {
            entry,
            children: Vec::new(),
        });
        match stack.last() {
            None => roots.push(idx),
            Some(&(_, parent)) => {
                if let Some(parent) = arena.get_mut(parent) {
                    parent.children.push(idx);
                }
            }
        }
        stack.push((level, idx));
    }

    trace!("view holds {} nodes under {} roots", arena.len(), roots.len());
    roots
        .into_iter()
        .filter_map(|root| materialize(&mut arena, root))
        .collect()
}

/// Direct children of `id`, each carrying its own children down to the depth limit.
#[instrument(level = "debug", skip(nodes))]
pub fn children_of(nodes: &IndexMap<NodeId, Node>, id: &NodeId, options: &ViewOptions) -> TreeResult<Vec<ViewNode>> {
    if !nodes.contains_key(id) {
        return Err(TreeError::NotFound(id.clone()));
    }

    let mut by_parent: HashMap<&NodeId, Vec<&Node>> = HashMap::new();
    for node in nodes.values() {
        if let Some(parent) = &node.parent {
            by_parent.entry(parent).or_default().push(node);
        }
    }

    fn collect(
        nodes: &IndexMap<NodeId, Node>,
        by_parent: &HashMap<&NodeId, Vec<&Node>>,
        parent: &NodeId,
        options: &ViewOptions,
    ) -> Vec<ViewNode> {
        let Some(kids) = by_parent.get(parent) else {
            return Vec::new();
        };
        kids.iter()
            .map(|&child| {
                let entry = annotate(nodes, child, options);
                let descend = options.depth_limit.map_or(true, |limit| limit > child.level);
                let children = if descend {
                    collect(nodes, by_parent, &child.id, options)
                } else {
                    Vec::new()
                };
                ViewNode {
                    node: entry.node,
                    selected: entry.selected,
                    visible: entry.visible,
                    children,
                }
            })
            .collect()
    }

    Ok(collect(nodes, &by_parent, id, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flat;
    use serde_json::json;

    fn sample() -> IndexMap<NodeId, Node> {
        let records = vec![
            json!({"id": 1, "parent_id": null}),
            json!({"id": 2, "parent_id": 1}),
            json!({"id": 3, "parent_id": 1}),
            json!({"id": 4, "parent_id": 2}),
            json!({"id": 10}),
        ];
        flat::build(&records, &FieldSchema::default()).unwrap()
    }

    fn shape(view: &[ViewNode]) -> String {
        view.iter()
            .map(|n| {
                if n.children.is_empty() {
                    n.id().to_string()
                } else {
                    format!("{}({})", n.id(), shape(&n.children))
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn given_no_filters_when_building_view_then_reproduces_forest() {
        let view = build_view(&sample(), &ViewOptions::new());
        assert_eq!(shape(&view), "1(2(4),3),10");
    }

    #[test]
    fn given_start_when_building_view_then_start_becomes_single_root() {
        let view = build_view(&sample(), &ViewOptions::new().start_at(2));
        assert_eq!(shape(&view), "2(4)");
    }

    #[test]
    fn given_depth_limit_when_building_view_then_cuts_deeper_levels() {
        let nodes = sample();
        assert_eq!(shape(&build_view(&nodes, &ViewOptions::new().depth(0))), "1,10");
        assert_eq!(shape(&build_view(&nodes, &ViewOptions::new().depth(1))), "1(2,3),10");
    }

    #[test]
    fn given_selection_when_building_view_then_annotates_copies_only() {
        let nodes = sample();
        let before = nodes.clone();

        let view = build_view(&nodes, &ViewOptions::new().select(4));

        let all = view[0].walk();
        let selected: Vec<String> = all.iter().filter(|n| n.selected).map(|n| n.id().to_string()).collect();
        assert_eq!(selected, vec!["1", "2", "4"]);
        assert!(all.iter().all(|n| n.visible));
        assert_eq!(nodes, before);
    }

    #[test]
    fn given_view_node_when_rendering_then_children_nest_under_schema_key() {
        let schema = FieldSchema::default();
        let view = build_view(&sample(), &ViewOptions::new().start_at(2));
        let record = view[0].to_record(&schema);
        assert_eq!(record["children"][0]["id"], json!(4));
        assert_eq!(record["selected"], json!(false));
        assert_eq!(record["visible"], json!(true));
    }

    #[test]
    fn given_filters_when_building_flat_view_then_keeps_store_order() {
        let entries = flat_view(&sample(), &ViewOptions::new().start_at(1).depth(1));
        let ids: Vec<String> = entries.iter().map(|e| e.node.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn given_node_when_listing_children_then_nests_grandchildren() {
        let children = children_of(&sample(), &NodeId::Int(1), &ViewOptions::new()).unwrap();
        assert_eq!(shape(&children), "2(4),3");
    }

    #[test]
    fn given_depth_limit_when_listing_children_then_stops_at_limit() {
        let children = children_of(&sample(), &NodeId::Int(1), &ViewOptions::new().depth(1)).unwrap();
        assert_eq!(shape(&children), "2,3");
    }

    #[test]
    fn given_node_below_depth_limit_when_listing_children_then_returns_direct_children_only() {
        let children = children_of(&sample(), &NodeId::Int(2), &ViewOptions::new().depth(0)).unwrap();
        assert_eq!(shape(&children), "4");
        assert_eq!(children[0].node.level, 2);
    }

    #[test]
    fn given_unknown_id_when_listing_children_then_not_found() {
        let err = children_of(&sample(), &NodeId::Int(99), &ViewOptions::new()).unwrap_err();
        assert_eq!(err, TreeError::NotFound(NodeId::Int(99)));
    }
}
