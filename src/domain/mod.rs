//! Domain layer: the hierarchy engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod breadcrumbs;
pub mod error;
pub mod flat;
pub mod nested;
pub mod nested_set;
pub mod node;
pub mod schema;
pub mod selection;
pub mod siblings;
pub mod store;
pub mod view;

pub use error::{TreeError, TreeResult};
pub use node::{NodeId, Node, Record};
pub use schema::{FieldSchema, Glyphs};
pub use store::{Snapshot, TreeStore};
pub use view::{FlatEntry, ViewNode, ViewOptions};
