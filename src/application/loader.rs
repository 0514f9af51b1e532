//! Reads record files into a `TreeStore` and writes snapshots back out.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{AppError, AppResult, IoResultExt};
use crate::domain::{FieldSchema, Snapshot, TreeStore};

/// Shape of an input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputShape {
    /// List of records with parent references
    #[default]
    Flat,
    /// Records nesting their children
    Nested,
    /// Output of `treeline export`
    Snapshot,
}

/// Loads stores from JSON files using one field schema.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    schema: FieldSchema,
}

impl Loader {
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Reads a JSON record list.
    ///
    /// A top-level object is accepted as well and its values are taken in
    /// order, so maps keyed by id load like lists.
    #[instrument(level = "debug", skip(self))]
    pub fn read_records(&self, path: &Path) -> AppResult<Vec<Value>> {
        let content = std::fs::read_to_string(path).with_path_context("read records", path)?;
        let value: Value = serde_json::from_str(&content).with_path_context("parse records", path)?;
        match value {
            Value::Array(records) => Ok(records),
            Value::Object(map) => Ok(map.into_values().collect()),
            _ => Err(AppError::InvalidInput {
                path: path.to_path_buf(),
                message: "expected a list of records".to_string(),
            }),
        }
    }

    /// Builds a store from `path` interpreted as `shape`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path, shape: InputShape) -> AppResult<TreeStore> {
        let store = match shape {
            InputShape::Flat => TreeStore::load_flat(&self.read_records(path)?, &self.schema)?,
            InputShape::Nested => TreeStore::load_nested(&self.read_records(path)?, &self.schema)?,
            InputShape::Snapshot => {
                let content = std::fs::read_to_string(path).with_path_context("read snapshot", path)?;
                let snapshot: Snapshot =
                    serde_json::from_str(&content).with_path_context("parse snapshot", path)?;
                TreeStore::restore(snapshot)
            }
        };
        debug!("loaded {} nodes from {}", store.len(), path.display());
        Ok(store)
    }

    /// Serializes the store's snapshot as pretty JSON.
    pub fn snapshot_json(&self, store: &TreeStore) -> AppResult<String> {
        serde_json::to_string_pretty(&store.export()).map_err(|e| AppError::OperationFailed {
            context: "serialize snapshot".to_string(),
            source: Box::new(e),
        })
    }

    #[instrument(level = "debug", skip(self, store))]
    pub fn write_snapshot(&self, store: &TreeStore, path: &Path) -> AppResult<()> {
        let json = self.snapshot_json(store)?;
        std::fs::write(path, json).with_path_context("write snapshot", path)
    }
}
