//! Configuration defaults, merging and the active-schema choice.

use glyphflow_core::{CoreConfig, DEFAULT_SCHEMA};

#[test]
fn missing_file_writes_and_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config, CoreConfig::default());
    assert_eq!(config.undo_redo_limit, 50);
    assert!(config.autosave);
    assert!(path.exists(), "defaults must be persisted on first load");

    // A second load reads the file it just wrote.
    assert_eq!(CoreConfig::load(&path).unwrap(), config);
}

#[test]
fn partial_file_merges_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"undo_redo_limit": 10, "autosave": false}"#).unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config.undo_redo_limit, 10);
    assert!(!config.autosave);
    assert_eq!(config.data_path, "data/node_data.json");
    assert_eq!(config.default_schema.len(), DEFAULT_SCHEMA.len());
}

#[test]
fn active_schema_prefers_a_non_empty_custom_list() {
    let mut config = CoreConfig::default();
    assert_eq!(config.active_schema()[0], "Project");

    config.custom_schema = vec!["Goal".to_string(), "Step".to_string()];
    assert_eq!(config.active_schema(), ["Goal", "Step"]);
}

#[test]
fn save_round_trips_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = CoreConfig::default();
    config.custom_schema = vec!["Goal".to_string()];
    config.save(&path).unwrap();

    assert_eq!(CoreConfig::load(&path).unwrap(), config);
    assert!(!dir.path().join("nested").join("config.json.tmp").exists());
}
