//! Core engine for the Glyph.Flow workflow tree.
//! This crate is the single source of truth for structural invariants.

pub mod config;
pub mod history;
pub mod logging;
pub mod model;
pub mod persist;
pub mod schema;
pub mod search;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use history::diff::{Diff, FieldDelta, ToggleChange};
pub use history::undo_redo::{UndoRedoLog, DEFAULT_HISTORY_LIMIT};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::node::Node;
pub use model::node_id::{NodeId, NodeIdParseError};
pub use persist::json_io::{load_tree, records_into_roots, save_tree, NodeRecord, PersistError};
pub use schema::{NodeSchema, SchemaLabelError, DEFAULT_SCHEMA};
pub use search::query::{search_nodes, SearchHit, SearchMode};
pub use service::tree_service::{CreateRequest, EditRequest, TreeError, TreeService};
pub use store::node_store::NodeStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
