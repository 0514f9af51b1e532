//! Flat and nested hierarchies of records.
//!
//! A [`TreeStore`] is built from flat records (each naming its parent) or from
//! nested records (each holding its children). Every node carries its level,
//! breadcrumb path, sibling flags and tree-line glyphs; views add selection,
//! visibility, subtree and depth filtering, and nested-set bounds can be
//! computed on demand.
//!
//! ```
//! use serde_json::json;
//! use treeline::{FieldSchema, NodeId, TreeStore, ViewOptions};
//!
//! let records = vec![
//!     json!({"id": 1}),
//!     json!({"id": 2, "parent_id": 1}),
//! ];
//! let store = TreeStore::load_flat(&records, &FieldSchema::default()).unwrap();
//! assert_eq!(store.breadcrumb_of(&NodeId::Int(2)).unwrap(), &[NodeId::Int(1), NodeId::Int(2)]);
//!
//! let view = store.nested_view(&ViewOptions::new().select(2));
//! assert_eq!(view[0].children.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{
    FieldSchema, FlatEntry, Glyphs, Node, NodeId, Record, Snapshot, TreeError, TreeResult, TreeStore,
    ViewNode, ViewOptions,
};
