//! Flattens nested records (each optionally carrying children) into the canonical map.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::breadcrumbs;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Node, NodeId, Record};
use crate::domain::schema::FieldSchema;
use crate::domain::siblings;

struct Pending<'a> {
    record: &'a Value,
    parent: Option<NodeId>,
    level: usize,
    position: usize,
}

/// Walks the nested structure depth-first and returns a pre-order map.
///
/// Ids are preserved; parent, level and (if the schema has a sort field)
/// sibling position are re-derived from the structure, overriding any
/// values carried by the input.
#[instrument(level = "debug", skip(records, schema), fields(records = records.len()))]
pub fn build(records: &[Value], schema: &FieldSchema) -> TreeResult<IndexMap<NodeId, Node>> {
    let structural = schema.structural_keys();
    let mut nodes: IndexMap<NodeId, Node> = IndexMap::new();

    let mut stack: Vec<Pending> = records
        .iter()
        .enumerate()
        .rev()
        .map(|(position, record)| Pending {
            record,
            parent: None,
            level: 0,
            position,
        })
        .collect();

    let mut index = 0;
    while let Some(pending) = stack.pop() {
        let record = pending
            .record
            .as_object()
            .ok_or_else(|| TreeError::malformed(index, "record is not an object"))?;
        let id = record
            .get(&schema.id)
            .and_then(NodeId::from_value)
            .ok_or_else(|| TreeError::malformed(index, format!("missing or invalid '{}' field", schema.id)))?;
        if nodes.contains_key(&id) {
            return Err(TreeError::malformed(index, format!("duplicate id {}", id)));
        }

        let children = match record.get(&schema.children) {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(children)) => children.as_slice(),
            Some(_) => {
                return Err(TreeError::malformed(
                    index,
                    format!("'{}' of node {} is not a list", schema.children, id),
                ))
            }
        };
        stack.extend(children.iter().enumerate().rev().map(|(position, child)| Pending {
            record: child,
            parent: Some(id.clone()),
            level: pending.level + 1,
            position,
        }));

        let attributes: Record = record
            .iter()
            .filter(|(k, _)| !structural.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let sort_key = schema.sort.as_ref().map(|_| Value::from(pending.position));
        let mut node = Node::new(id.clone(), pending.parent, sort_key, attributes);
        node.level = pending.level;
        nodes.insert(id, node);
        index += 1;
    }

    siblings::apply(&mut nodes, &schema.glyphs);
    breadcrumbs::apply(&mut nodes, schema.origin.as_ref());
    debug!("flattened {} nested nodes", nodes.len());
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_nested_records_when_flattening_then_assigns_parent_and_level() {
        let records = vec![json!({
            "id": 1,
            "children": [
                {"id": 2, "children": [{"id": 4}]},
                {"id": 3}
            ]
        })];

        let map = build(&records, &FieldSchema::default()).unwrap();

        let order: Vec<String> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(order, vec!["1", "2", "4", "3"]);
        assert_eq!(map[&NodeId::Int(4)].parent, Some(NodeId::Int(2)));
        assert_eq!(map[&NodeId::Int(4)].level, 2);
        assert!(map[&NodeId::Int(3)].is_last);
        assert!(map[&NodeId::Int(2)].is_first);
    }

    #[test]
    fn given_stale_structure_fields_when_flattening_then_rederives_them() {
        let records = vec![json!({
            "id": 1,
            "parent_id": 77,
            "level": 5,
            "pos": 9,
            "label": "kept",
            "children": [{"id": 2, "pos": 4}, {"id": 3, "pos": 0}]
        })];
        let schema = FieldSchema::default().with_sort("pos");

        let map = build(&records, &schema).unwrap();

        let root = &map[&NodeId::Int(1)];
        assert_eq!(root.parent, None);
        assert_eq!(root.level, 0);
        assert_eq!(root.sort_key, Some(json!(0)));
        assert_eq!(root.attribute("label"), Some(&json!("kept")));
        assert!(root.attribute("children").is_none());
        assert_eq!(map[&NodeId::Int(3)].sort_key, Some(json!(1)));
    }

    #[test]
    fn given_no_sort_field_when_flattening_then_sort_key_absent() {
        let map = build(&[json!({"id": "a"})], &FieldSchema::default()).unwrap();
        assert_eq!(map[&NodeId::from("a")].sort_key, None);
    }

    #[test]
    fn given_child_without_id_when_flattening_then_malformed() {
        let records = vec![json!({"id": 1, "children": [{"name": "x"}]})];
        let err = build(&records, &FieldSchema::default()).unwrap_err();
        assert!(matches!(err, TreeError::MalformedInput { index: 1, .. }));
    }

    #[test]
    fn given_non_list_children_when_flattening_then_malformed() {
        let records = vec![json!({"id": 1, "children": {"id": 2}})];
        let err = build(&records, &FieldSchema::default()).unwrap_err();
        assert!(matches!(err, TreeError::MalformedInput { index: 0, .. }));
    }

    #[test]
    fn given_repeated_id_when_flattening_then_malformed() {
        let records = vec![json!({"id": 1, "children": [{"id": 1}]})];
        let err = build(&records, &FieldSchema::default()).unwrap_err();
        assert!(matches!(err, TreeError::MalformedInput { .. }));
    }
}
