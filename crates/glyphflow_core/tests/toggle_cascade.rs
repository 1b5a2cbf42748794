//! Completion toggling and its cascade over implicitly-set descendants.

use glyphflow_core::{CreateRequest, NodeId, TreeError, TreeService};

fn id(text: &str) -> NodeId {
    NodeId::parse(text).unwrap()
}

fn project_with_two_phases() -> TreeService {
    let mut service = TreeService::default();
    let root = service.create(&CreateRequest::new("Project", "Alpha")).unwrap();
    service
        .create(&CreateRequest::new("Phase", "P1").under(root.clone()))
        .unwrap();
    service
        .create(&CreateRequest::new("Phase", "P2").under(root))
        .unwrap();
    service
}

#[test]
fn toggle_flips_and_cascades_to_implicit_descendants() {
    let mut service = project_with_two_phases();

    let status = service.toggle(&id("01")).unwrap();
    assert!(status);

    let root = service.node(&id("01")).unwrap();
    assert!(root.done && root.done_explicit);
    for child_id in ["01.01", "01.02"] {
        let child = service.node(&id(child_id)).unwrap();
        assert!(child.done);
        assert!(!child.done_explicit, "cascade must not mark children explicit");
    }
}

#[test]
fn cascade_skips_explicitly_set_descendants() {
    let mut service = project_with_two_phases();

    // P2 was completed directly; a later ancestor toggle must not undo it.
    service.toggle(&id("01.02")).unwrap();
    service.toggle(&id("01")).unwrap();
    let status = service.toggle(&id("01")).unwrap();
    assert!(!status);

    assert!(!service.node(&id("01.01")).unwrap().done);
    let explicit = service.node(&id("01.02")).unwrap();
    assert!(explicit.done && explicit.done_explicit);
}

#[test]
fn toggle_drives_progress() {
    let mut service = project_with_two_phases();
    assert_eq!(service.node(&id("01")).unwrap().progress(), 0);

    service.toggle(&id("01.01")).unwrap();
    assert_eq!(service.node(&id("01")).unwrap().progress(), 50);

    service.toggle(&id("01.02")).unwrap();
    assert_eq!(service.node(&id("01")).unwrap().progress(), 100);
}

#[test]
fn toggle_unknown_node_fails() {
    let mut service = TreeService::default();
    let missing = service.toggle(&id("04")).unwrap_err();
    assert!(matches!(missing, TreeError::NodeNotFound(_)));
}
