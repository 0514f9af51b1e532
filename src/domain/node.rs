//! Canonical node representation and record rendering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::schema::FieldSchema;

/// A record as supplied by, or handed back to, the caller.
pub type Record = Map<String, Value>;

/// Opaque node identifier.
///
/// Integer-looking strings normalize to integers, so `"7"` and `7` refer to
/// the same node regardless of how the source encoded them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl NodeId {
    /// Reads an id from a record value; `None` for null, empty or non-scalar values.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| whole_float(n.as_f64()?)).map(NodeId::Int),
            Value::String(s) if !s.is_empty() => Some(NodeId::from(s.as_str())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            NodeId::Int(i) => Value::from(*i),
            NodeId::Str(s) => Value::from(s.as_str()),
        }
    }
}

/// `1.0` names the same node as `1`; fractional or out-of-range floats are not ids.
fn whole_float(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(i) if i.to_string() == value => NodeId::Int(i),
            _ => NodeId::Str(value.to_string()),
        }
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::from(value.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(i) => write!(f, "{}", i),
            NodeId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Total order over sort-key values: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// A node of the canonical flat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Parent id, `None` for roots
    pub parent: Option<NodeId>,
    /// Depth, roots are 0
    pub level: usize,
    pub sort_key: Option<Value>,
    /// Ancestor path root → self
    pub breadcrumbs: Vec<NodeId>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_only: bool,
    /// Tree-line prefix glyphs
    pub icons: Vec<String>,
    /// Nested-set bounds, set by `recompute_nested_set`
    pub left: Option<u64>,
    pub right: Option<u64>,
    /// Caller attributes passed through unchanged
    pub attributes: Record,
}

impl Node {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>, sort_key: Option<Value>, attributes: Record) -> Self {
        Self {
            id,
            parent,
            level: 0,
            sort_key,
            breadcrumbs: Vec::new(),
            is_first: false,
            is_last: false,
            is_only: false,
            icons: Vec::new(),
            left: None,
            right: None,
            attributes,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Renders the node as a record keyed by the schema's field names.
    pub fn to_record(&self, schema: &FieldSchema) -> Record {
        let mut record = self.attributes.clone();
        record.insert(schema.id.clone(), self.id.to_value());
        record.insert(
            schema.parent.clone(),
            self.parent.as_ref().map(NodeId::to_value).unwrap_or(Value::Null),
        );
        if let (Some(sort), Some(key)) = (&schema.sort, &self.sort_key) {
            record.insert(sort.clone(), key.clone());
        }
        record.insert(schema.level.clone(), Value::from(self.level));
        record.insert(
            schema.breadcrumbs.clone(),
            Value::Array(self.breadcrumbs.iter().map(NodeId::to_value).collect()),
        );
        record.insert(schema.first.clone(), Value::Bool(self.is_first));
        record.insert(schema.last.clone(), Value::Bool(self.is_last));
        record.insert(schema.only.clone(), Value::Bool(self.is_only));
        record.insert(
            schema.icons.clone(),
            Value::Array(self.icons.iter().map(|i| Value::from(i.as_str())).collect()),
        );
        if let Some(left) = self.left {
            record.insert(schema.left.clone(), Value::from(left));
        }
        if let Some(right) = self.right {
            record.insert(schema.right.clone(), Value::from(right));
        }
        record
    }
}
