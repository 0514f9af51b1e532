//! Builds the canonical map from a flat record list carrying parent references.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::breadcrumbs;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{compare_values, Node, NodeId, Record};
use crate::domain::schema::FieldSchema;
use crate::domain::siblings;

/// Reads the id, parent and sort key of one record; the rest passes through.
fn parse_record(index: usize, value: &Value, schema: &FieldSchema) -> TreeResult<Node> {
    let record = value
        .as_object()
        .ok_or_else(|| TreeError::malformed(index, "record is not an object"))?;
    let id = record
        .get(&schema.id)
        .and_then(NodeId::from_value)
        .ok_or_else(|| TreeError::malformed(index, format!("missing or invalid '{}' field", schema.id)))?;
    let parent = record.get(&schema.parent).and_then(NodeId::from_value);
    let sort_key = schema
        .sort
        .as_ref()
        .and_then(|key| record.get(key))
        .filter(|v| !v.is_null())
        .cloned();

    let structural = schema.structural_keys();
    let attributes: Record = record
        .iter()
        .filter(|(k, _)| !structural.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(Node::new(id, parent, sort_key, attributes))
}

fn compare_sort_keys(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parses, normalizes and orders flat records into a pre-order map.
///
/// Nothing is written to any store here; the caller swaps the returned map in.
#[instrument(level = "debug", skip(records, schema), fields(records = records.len()))]
pub fn build(records: &[Value], schema: &FieldSchema) -> TreeResult<IndexMap<NodeId, Node>> {
    // Parse everything first so a malformed record aborts the whole build
    let mut parsed: IndexMap<NodeId, Node> = IndexMap::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        let node = parse_record(index, value, schema)?;
        if let Some(previous) = parsed.insert(node.id.clone(), node) {
            warn!("duplicate id {} at position {}, keeping the later record", previous.id, index);
        }
    }

    let known: HashSet<NodeId> = parsed.keys().cloned().collect();
    for node in parsed.values_mut() {
        match &node.parent {
            Some(parent) if parent == &node.id => {
                warn!("node {} lists itself as parent, treating it as a root", node.id);
                node.parent = None;
            }
            Some(parent) if !known.contains(parent) => {
                warn!("parent {} of node {} is not in the input, treating it as a root", parent, node.id);
                node.parent = None;
            }
            _ => {}
        }
    }

    // Stable: siblings with equal sort keys keep input order
    let mut sorted: Vec<Node> = parsed.into_values().collect();
    sorted.sort_by(|a, b| a.parent.cmp(&b.parent).then_with(|| compare_sort_keys(&a.sort_key, &b.sort_key)));

    // parent -> positions of its children in sorted order
    let mut children: HashMap<Option<NodeId>, Vec<usize>> = HashMap::new();
    for (position, node) in sorted.iter().enumerate() {
        children.entry(node.parent.clone()).or_default().push(position);
    }

    let mut slots: Vec<Option<Node>> = sorted.into_iter().map(Some).collect();
    let mut emitted: IndexMap<NodeId, Node> = IndexMap::with_capacity(slots.len());

    // Depth-first expansion from the roots, children pushed in reverse for sort order
    let mut stack: Vec<(usize, usize)> = children
        .get(&None)
        .map(|roots| roots.iter().rev().map(|&p| (p, 0)).collect())
        .unwrap_or_default();
    while let Some((position, level)) = stack.pop() {
        let Some(mut node) = slots[position].take() else {
            continue;
        };
        node.level = level;
        if let Some(kids) = children.get(&Some(node.id.clone())) {
            stack.extend(kids.iter().rev().map(|&p| (p, level + 1)));
        }
        emitted.insert(node.id.clone(), node);
    }

    // Whatever was not reached hangs off a parent cycle
    if let Some(orphan) = slots.into_iter().flatten().next() {
        return Err(TreeError::CycleDetected(orphan.id));
    }

    siblings::apply(&mut emitted, &schema.glyphs);
    breadcrumbs::apply(&mut emitted, schema.origin.as_ref());
    debug!("built {} nodes from flat records", emitted.len());
    Ok(emitted)
}
