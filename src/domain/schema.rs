//! Field-name configuration for reading and writing node records.

use serde::{Deserialize, Serialize};

use crate::domain::node::NodeId;

/// Glyph strings used to draw the tree-line prefix of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Glyphs {
    /// Ancestor column below a last sibling
    pub empty: String,
    /// Connector for a child followed by further siblings
    pub join: String,
    /// Connector for the last child of a group
    pub bottom: String,
    /// Ancestor column below a sibling that has followers
    pub bar: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            empty: "\u{a0}\u{a0}".into(),
            join: "├─".into(),
            bottom: "└─".into(),
            bar: "│\u{a0}".into(),
        }
    }
}

/// Maps each logical node role to the attribute key used in records.
///
/// Unspecified roles fall back to the built-in names, so a schema read from
/// TOML only needs to list the keys that differ:
///
/// ```toml
/// [schema]
/// parent = "parent_id"
/// sort = "position"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldSchema {
    pub id: String,
    pub parent: String,
    /// Sibling ordering key; `None` keeps input order
    pub sort: Option<String>,
    pub level: String,
    pub children: String,
    pub breadcrumbs: String,
    pub icons: String,
    pub first: String,
    pub last: String,
    pub only: String,
    pub selected: String,
    pub visible: String,
    pub left: String,
    pub right: String,
    /// Id excluded from every breadcrumb path (e.g. a synthetic `0` root)
    pub origin: Option<NodeId>,
    pub glyphs: Glyphs,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            id: "id".into(),
            parent: "parent_id".into(),
            sort: None,
            level: "level".into(),
            children: "children".into(),
            breadcrumbs: "breadcrumbs".into(),
            icons: "icons".into(),
            first: "first".into(),
            last: "last".into(),
            only: "only".into(),
            selected: "selected".into(),
            visible: "visible".into(),
            left: "left".into(),
            right: "right".into(),
            origin: None,
            glyphs: Glyphs::default(),
        }
    }
}

impl FieldSchema {
    /// Keys owned by the engine; they never pass through as caller attributes.
    pub fn structural_keys(&self) -> Vec<&str> {
        let mut keys = vec![
            self.id.as_str(),
            self.parent.as_str(),
            self.level.as_str(),
            self.children.as_str(),
            self.breadcrumbs.as_str(),
            self.icons.as_str(),
            self.first.as_str(),
            self.last.as_str(),
            self.only.as_str(),
            self.selected.as_str(),
            self.visible.as_str(),
            self.left.as_str(),
            self.right.as_str(),
        ];
        if let Some(sort) = &self.sort {
            keys.push(sort.as_str());
        }
        keys
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<NodeId>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_toml_when_deserializing_then_fills_defaults() {
        let schema: FieldSchema = toml::from_str(
            r#"
parent = "pid"
sort = "position"

[glyphs]
join = "+-"
"#,
        )
        .expect("parse schema");

        assert_eq!(schema.id, "id");
        assert_eq!(schema.parent, "pid");
        assert_eq!(schema.sort.as_deref(), Some("position"));
        assert_eq!(schema.glyphs.join, "+-");
        assert_eq!(schema.glyphs.bottom, "└─");
        assert!(schema.origin.is_none());
    }

    #[test]
    fn given_sort_field_when_listing_structural_keys_then_includes_it() {
        let schema = FieldSchema::default().with_sort("weight");
        let keys = schema.structural_keys();
        assert!(keys.contains(&"weight"));
        assert!(keys.contains(&"parent_id"));
        assert!(!keys.contains(&"name"));
    }
}
