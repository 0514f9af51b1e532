/*
Display conversions for nested views.

`to_tree_string` hands the forest to termtree, which draws its own connectors.
`to_lines` uses the glyphs computed by the engine, so the output honours the
configured schema glyphs and marks selected nodes.
 */
use serde_json::Value;
use termtree::Tree;
use tracing::instrument;

use crate::domain::ViewNode;

/// One rendered row of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Concatenated icon glyphs
    pub prefix: String,
    pub label: String,
    pub selected: bool,
    pub visible: bool,
}

impl TreeLine {
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.label)
    }
}

/// Label of a view node: the `label` attribute if it is a scalar, otherwise the id.
pub fn node_label(node: &ViewNode, label: &str) -> String {
    match node.node.attribute(label) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => node.id().to_string(),
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, label: &str) -> Tree<String>;
    fn to_lines(&self, label: &str) -> Vec<TreeLine>;
}

impl TreeNodeConvert for ViewNode {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, label: &str) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(label))
            .collect();

        Tree::new(node_label(self, label)).with_leaves(leaves)
    }

    fn to_lines(&self, label: &str) -> Vec<TreeLine> {
        self.walk()
            .into_iter()
            .map(|n| TreeLine {
                prefix: n.node.icons.concat(),
                label: node_label(n, label),
                selected: n.selected,
                visible: n.visible,
            })
            .collect()
    }
}

// Implementation for a whole forest, rendered under a synthetic root
impl TreeNodeConvert for [ViewNode] {
    fn to_tree_string(&self, label: &str) -> Tree<String> {
        Tree::new(".".to_string()).with_leaves(self.iter().map(|root| root.to_tree_string(label)))
    }

    fn to_lines(&self, label: &str) -> Vec<TreeLine> {
        self.iter().flat_map(|root| root.to_lines(label)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSchema, TreeStore, ViewOptions};
    use serde_json::json;

    fn forest() -> Vec<ViewNode> {
        let records = vec![
            json!({"id": 1, "name": "root"}),
            json!({"id": 2, "parent_id": 1, "name": "a"}),
            json!({"id": 3, "parent_id": 1, "name": "b"}),
            json!({"id": 4, "parent_id": 2}),
        ];
        TreeStore::load_flat(&records, &FieldSchema::default())
            .unwrap()
            .nested_view(&ViewOptions::new())
    }

    #[test]
    fn given_forest_when_rendering_lines_then_uses_engine_glyphs() {
        let lines: Vec<String> = forest().to_lines("name").iter().map(TreeLine::text).collect();
        assert_eq!(lines, vec!["root", "├─a", "│\u{a0}└─4", "└─b"]);
    }

    #[test]
    fn given_forest_when_converting_to_termtree_then_keeps_structure() {
        let tree = forest()[0].to_tree_string("name");
        assert_eq!(tree.root, "root");
        assert_eq!(tree.leaves.len(), 2);
        assert_eq!(tree.leaves[0].leaves[0].root, "4");
    }
}
