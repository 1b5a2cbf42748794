//! Tree document persistence: atomic save, lenient load, id rebuild.

use glyphflow_core::{
    load_tree, records_into_roots, save_tree, CreateRequest, EditRequest, NodeId,
    NodeSchema, TreeService, DEFAULT_HISTORY_LIMIT,
};

fn id(text: &str) -> NodeId {
    NodeId::parse(text).unwrap()
}

fn sample_tree() -> TreeService {
    let mut service = TreeService::default();
    let alpha = service.create(&CreateRequest::new("Project", "Alpha")).unwrap();
    let phase = service
        .create(&CreateRequest::new("Phase", "P1").under(alpha))
        .unwrap();
    service
        .create(&CreateRequest::new("Task", "T1").under(phase))
        .unwrap();
    service
        .edit(
            &id("01.01.01"),
            &EditRequest {
                deadline: Some("2026-10-01".to_string()),
                ..EditRequest::default()
            },
        )
        .unwrap();
    service.toggle(&id("01.01.01")).unwrap();
    service
}

#[test]
fn save_then_load_rebuilds_an_identical_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("node_data.json");
    let service = sample_tree();

    save_tree(&path, service.roots()).unwrap();
    let records = load_tree(&path).unwrap();
    let reloaded = TreeService::from_roots(
        records_into_roots(records),
        NodeSchema::default(),
        DEFAULT_HISTORY_LIMIT,
    );

    assert_eq!(reloaded.roots(), service.roots());
    let task = reloaded.node(&id("01.01.01")).unwrap();
    assert_eq!(task.deadline.as_deref(), Some("2026-10-01"));
    assert!(task.done && task.done_explicit);
}

#[test]
fn missing_file_loads_as_an_empty_forest() {
    let dir = tempfile::tempdir().unwrap();
    let records = load_tree(&dir.path().join("absent.json")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn document_shape_uses_type_and_padded_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("node_data.json");
    save_tree(&path, sample_tree().roots()).unwrap();

    let body = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert!(doc.is_array());
    assert_eq!(doc[0]["id"], "01");
    assert_eq!(doc[0]["type"], "Project");
    assert_eq!(doc[0]["children"][0]["id"], "01.01");
    assert_eq!(doc[0]["children"][0]["children"][0]["deadline"], "2026-10-01");
    assert!(!dir.path().join("node_data.json.tmp").exists());
}

#[test]
fn minimal_hand_written_document_normalizes_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.json");
    std::fs::write(
        &path,
        r#"[{"name": "Solo", "children": [{"name": "Inner"}]}]"#,
    )
    .unwrap();

    let service = TreeService::from_roots(
        records_into_roots(load_tree(&path).unwrap()),
        NodeSchema::default(),
        DEFAULT_HISTORY_LIMIT,
    );

    let root = service.node(&id("01")).unwrap();
    assert_eq!(root.name, "Solo");
    assert_eq!(root.type_label, "Project");
    assert!(root.created_at > 0);
    let inner = service.node(&id("01.01")).unwrap();
    assert_eq!(inner.name, "Inner");
    assert_eq!(inner.type_label, "Phase");
}

#[test]
fn malformed_document_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let error = load_tree(&path).unwrap_err();
    assert!(error.to_string().contains("parse"));
}
