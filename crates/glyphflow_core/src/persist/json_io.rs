//! JSON persistence for the workflow forest.
//!
//! # Responsibility
//! - Serialize the tree to a JSON document and rebuild it on load.
//! - Keep the on-disk shape lenient: missing optional fields default.
//!
//! # Invariants
//! - Saves are atomic: written to a sibling temp file, then renamed.
//! - Ids are rebuilt deterministically from child rank on load; the stored
//!   `id` text is informational, never trusted.

use crate::model::node::{now_epoch_ms, Node};
use crate::model::node_id::NodeId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Errors from tree persistence.
#[derive(Debug)]
pub enum PersistError {
    /// Filesystem failure (open, write, rename).
    Io(std::io::Error),
    /// Document is not valid JSON for the expected shape.
    Json(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "tree file i/o error: {err}"),
            Self::Json(err) => write!(f, "tree file parse error: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// On-disk node shape. Children nest recursively; sibling order in the
/// document defines rank, which is all that is needed to rebuild ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRecord {
    /// Formatted positional id at save time (informational).
    #[serde(default)]
    pub id: String,
    /// Serialized as `type` to match the document schema naming.
    #[serde(rename = "type", default)]
    pub type_label: String,
    pub name: String,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub full_desc: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default = "now_epoch_ms")]
    pub created_at: i64,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_explicit: bool,
    #[serde(default)]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    /// Snapshots a live node into its on-disk shape.
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            type_label: node.type_label.clone(),
            name: node.name.clone(),
            short_desc: node.short_desc.clone(),
            full_desc: node.full_desc.clone(),
            deadline: node.deadline.clone(),
            created_at: node.created_at,
            done: node.done,
            done_explicit: node.done_explicit,
            children: node.children.iter().map(Self::from_node).collect(),
        }
    }

    /// Rebuilds a live node; the id is a placeholder until the store
    /// renumbers the forest.
    pub fn into_node(self) -> Node {
        Node {
            id: NodeId::root(1),
            type_label: self.type_label,
            name: self.name,
            short_desc: self.short_desc,
            full_desc: self.full_desc,
            deadline: self.deadline,
            created_at: self.created_at,
            done: self.done,
            done_explicit: self.done_explicit,
            children: self
                .children
                .into_iter()
                .map(NodeRecord::into_node)
                .collect(),
        }
    }
}

/// Writes the forest as a pretty-printed JSON array of root records.
pub fn save_tree(path: &Path, roots: &[Node]) -> Result<(), PersistError> {
    let records: Vec<NodeRecord> = roots.iter().map(NodeRecord::from_node).collect();
    let body = serde_json::to_string_pretty(&records)?;
    write_atomic(path, body.as_bytes())?;
    Ok(())
}

/// Reads root records from disk. A missing file yields an empty forest.
pub fn load_tree(path: &Path) -> Result<Vec<NodeRecord>, PersistError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let body = fs::read_to_string(path)?;
    let records: Vec<NodeRecord> = serde_json::from_str(&body)?;
    Ok(records)
}

/// Rebuilds live root nodes from records. Callers pass the result to
/// `NodeStore::from_roots` (or `TreeService::from_roots`) which renumbers
/// every id and type label from rank alone.
pub fn records_into_roots(records: Vec<NodeRecord>) -> Vec<Node> {
    records.into_iter().map(NodeRecord::into_node).collect()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = Path::new(&tmp);
    fs::write(tmp_path, bytes)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
