//! File loading through the application layer.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use treeline::application::{AppError, InputShape, Loader};
use treeline::util::testing;
use treeline::{FieldSchema, NodeId, TreeError};

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_flat_file_when_loading_then_builds_store() {
    // Arrange
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "flat.json", &json!(testing::sample_records()).to_string());

    // Act
    let store = Loader::default().load(&path, InputShape::Flat).expect("load");

    // Assert
    assert_eq!(store.len(), 5);
    assert_eq!(
        store.breadcrumb_of(&NodeId::Int(5)).unwrap(),
        &[NodeId::Int(1), NodeId::Int(2), NodeId::Int(4), NodeId::Int(5)]
    );
}

#[test]
fn given_object_keyed_by_id_when_loading_then_takes_values_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "map.json",
        r#"{"b": {"id": "b", "parent_id": "a"}, "a": {"id": "a"}}"#,
    );

    let store = Loader::default().load(&path, InputShape::Flat).unwrap();

    let order: Vec<NodeId> = store.iter().map(|n| n.id.clone()).collect();
    assert_eq!(order, vec![NodeId::from("a"), NodeId::from("b")]);
}

#[test]
fn given_nested_file_with_custom_children_key_when_loading_then_uses_schema() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "nested.json",
        r#"[{"id": 1, "kids": [{"id": 2}, {"id": 3}]}]"#,
    );
    let mut schema = FieldSchema::default();
    schema.children = "kids".into();

    let store = Loader::new(schema).load(&path, InputShape::Nested).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.get(&NodeId::Int(3)).unwrap().parent, Some(NodeId::Int(1)));
}

#[test]
fn given_exported_snapshot_when_loading_then_restores_identical_store() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "flat.json", &json!(testing::sample_records()).to_string());
    let loader = Loader::default();
    let mut store = loader.load(&path, InputShape::Flat).unwrap();
    store.recompute_nested_set();
    let snapshot = dir.path().join("snapshot.json");

    loader.write_snapshot(&store, &snapshot).unwrap();
    let restored = loader.load(&snapshot, InputShape::Snapshot).unwrap();

    assert_eq!(restored, store);
}

#[test]
fn given_malformed_record_when_loading_then_tree_error_propagates() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"[{"id": 1}, "not a record"]"#);

    let err = Loader::default().load(&path, InputShape::Flat).unwrap_err();

    assert!(matches!(
        err,
        AppError::Tree(TreeError::MalformedInput { index: 1, .. })
    ));
}
