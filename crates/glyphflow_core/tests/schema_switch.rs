//! Switching the type schema and relabelling the live tree.

use glyphflow_core::{CreateRequest, NodeId, TreeError, TreeService};

fn id(text: &str) -> NodeId {
    NodeId::parse(text).unwrap()
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn empty_store_accepts_any_schema_length() {
    let mut service = TreeService::default();
    service.set_schema(labels(&["Goal", "Step"])).unwrap();

    let root = service.create(&CreateRequest::new("Goal", "Ship it")).unwrap();
    assert_eq!(root.to_string(), "01");
    assert_eq!(service.node(&root).unwrap().type_label, "Goal");

    let old_label = service
        .create(&CreateRequest::new("Project", "Nope"))
        .unwrap_err();
    assert!(matches!(
        old_label,
        TreeError::TypeMismatch { ref expected, .. } if expected == "Goal"
    ));
}

#[test]
fn schema_switch_relabels_every_depth() {
    let mut service = TreeService::default();
    let root = service.create(&CreateRequest::new("Project", "Alpha")).unwrap();
    service
        .create(&CreateRequest::new("Phase", "P1").under(root))
        .unwrap();

    service.set_schema(labels(&["Goal", "Step"])).unwrap();

    assert_eq!(service.node(&id("01")).unwrap().type_label, "Goal");
    assert_eq!(service.node(&id("01.01")).unwrap().type_label, "Step");
    assert_eq!(service.schema().max_depth(), 2);
}

#[test]
fn schema_length_must_match_occupied_depth() {
    let mut service = TreeService::default();
    let root = service.create(&CreateRequest::new("Project", "Alpha")).unwrap();
    service
        .create(&CreateRequest::new("Phase", "P1").under(root))
        .unwrap();

    let mismatch = service
        .set_schema(labels(&["Goal", "Step", "Extra"]))
        .unwrap_err();
    assert!(matches!(
        mismatch,
        TreeError::SchemaDepthMismatch { expected: 2, got: 3 }
    ));

    // The failed switch leaves the old labels in place.
    assert_eq!(service.node(&id("01")).unwrap().type_label, "Project");
}

#[test]
fn schema_labels_are_validated() {
    let mut service = TreeService::default();

    let empty = service.set_schema(Vec::new()).unwrap_err();
    assert!(matches!(empty, TreeError::EmptySchema));

    let duplicate = service
        .set_schema(labels(&["Goal", "Goal"]))
        .unwrap_err();
    assert!(matches!(
        duplicate,
        TreeError::DuplicateSchemaLabel(ref label) if label == "Goal"
    ));
}

#[test]
fn schema_switch_is_not_undoable() {
    let mut service = TreeService::default();
    service.create(&CreateRequest::new("Project", "Alpha")).unwrap();
    service.set_schema(labels(&["Goal"])).unwrap();

    // One undo reverts the create, not the schema switch.
    service.undo().unwrap();
    assert!(service.roots().is_empty());
    assert_eq!(service.schema().labels(), ["Goal".to_string()]);
    assert!(matches!(service.undo().unwrap_err(), TreeError::NothingToUndo));
}
