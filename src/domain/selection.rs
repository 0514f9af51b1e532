//! Selection and visibility predicates.
//!
//! Both predicates are advisory and fail closed: an id the map cannot
//! resolve yields `false` instead of an error.

use indexmap::IndexMap;

use crate::domain::node::{Node, NodeId};

/// True if `id` lies on the ancestor path of `reference` (self included).
pub fn is_selected(nodes: &IndexMap<NodeId, Node>, id: &NodeId, reference: &NodeId) -> bool {
    nodes
        .get(reference)
        .map(|r| r.breadcrumbs.contains(id))
        .unwrap_or(false)
}

/// True if `id` should be shown in a view rooted at `start` with `reference` expanded.
///
/// Top-level nodes of the view (level 0, or the level of `start`) are always
/// visible; any other node is visible when its parent lies on the ancestor
/// path of `reference`.
pub fn is_visible(
    nodes: &IndexMap<NodeId, Node>,
    id: &NodeId,
    reference: Option<&NodeId>,
    start: Option<&NodeId>,
) -> bool {
    let Some(node) = nodes.get(id) else {
        return false;
    };

    match start.and_then(|s| nodes.get(s)) {
        Some(start) if node.level == start.level => return true,
        None if node.level == 0 => return true,
        _ => {}
    }

    let Some(reference) = reference.and_then(|r| nodes.get(r)) else {
        return false;
    };
    let crumbs = &node.breadcrumbs;
    crumbs.len() >= 2 && reference.breadcrumbs.contains(&crumbs[crumbs.len() - 2])
}

/// `is_selected` OR-ed across a set of references.
pub fn is_selected_any(nodes: &IndexMap<NodeId, Node>, id: &NodeId, references: &[NodeId]) -> bool {
    references.iter().any(|r| is_selected(nodes, id, r))
}

/// `is_visible` OR-ed across a set of references; an empty set means no selection.
pub fn is_visible_any(
    nodes: &IndexMap<NodeId, Node>,
    id: &NodeId,
    references: &[NodeId],
    start: Option<&NodeId>,
) -> bool {
    if references.is_empty() {
        return is_visible(nodes, id, None, start);
    }
    references.iter().any(|r| is_visible(nodes, id, Some(r), start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flat;
    use crate::domain::schema::FieldSchema;
    use serde_json::json;

    // 1
    // ├─2
    // │ └─4
    // │   └─5
    // └─3
    fn sample() -> IndexMap<NodeId, Node> {
        let records = vec![
            json!({"id": 1}),
            json!({"id": 2, "parent_id": 1}),
            json!({"id": 3, "parent_id": 1}),
            json!({"id": 4, "parent_id": 2}),
            json!({"id": 5, "parent_id": 4}),
        ];
        flat::build(&records, &FieldSchema::default()).unwrap()
    }

    fn id(i: i64) -> NodeId {
        NodeId::Int(i)
    }

    #[test]
    fn given_ancestor_of_reference_when_checking_selected_then_true() {
        let nodes = sample();
        assert!(is_selected(&nodes, &id(1), &id(4)));
        assert!(is_selected(&nodes, &id(2), &id(4)));
        assert!(is_selected(&nodes, &id(4), &id(4)));
        assert!(!is_selected(&nodes, &id(3), &id(4)));
        assert!(!is_selected(&nodes, &id(5), &id(4)));
    }

    #[test]
    fn given_unknown_reference_when_checking_selected_then_fails_closed() {
        let nodes = sample();
        assert!(!is_selected(&nodes, &id(1), &id(99)));
    }

    #[test]
    fn given_no_start_when_checking_visible_then_roots_always_visible() {
        let nodes = sample();
        assert!(is_visible(&nodes, &id(1), None, None));
        assert!(!is_visible(&nodes, &id(2), None, None));
    }

    #[test]
    fn given_reference_when_checking_visible_then_children_of_expanded_branch_visible() {
        let nodes = sample();
        // reference 2 expands 1 and 2
        assert!(is_visible(&nodes, &id(2), Some(&id(2)), None));
        assert!(is_visible(&nodes, &id(3), Some(&id(2)), None));
        assert!(is_visible(&nodes, &id(4), Some(&id(2)), None));
        assert!(!is_visible(&nodes, &id(5), Some(&id(2)), None));
    }

    #[test]
    fn given_start_when_checking_visible_then_start_level_always_visible() {
        let nodes = sample();
        assert!(is_visible(&nodes, &id(3), None, Some(&id(2))));
        assert!(!is_visible(&nodes, &id(1), None, Some(&id(2))));
        assert!(is_visible(&nodes, &id(4), Some(&id(4)), Some(&id(2))));
    }

    #[test]
    fn given_unresolved_start_when_checking_visible_then_falls_back_to_roots() {
        let nodes = sample();
        assert!(is_visible(&nodes, &id(1), None, Some(&id(99))));
    }

    #[test]
    fn given_reference_set_when_checking_then_ors_members() {
        let nodes = sample();
        let refs = vec![id(3), id(5)];
        assert!(is_selected_any(&nodes, &id(4), &refs));
        assert!(is_selected_any(&nodes, &id(3), &refs));
        assert!(!is_selected_any(&nodes, &id(2), &[id(3)]));
        assert!(is_visible_any(&nodes, &id(5), &refs, None));
        assert!(!is_visible_any(&nodes, &id(5), &[], None));
        assert!(is_visible_any(&nodes, &id(1), &[], None));
    }
}
