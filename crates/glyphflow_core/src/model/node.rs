//! Workflow node domain model.
//!
//! # Responsibility
//! - Define the canonical tree record (Project / Phase / Task / Subtask).
//! - Keep child ownership exclusive so sibling rank defines identity.
//!
//! # Invariants
//! - `id` always equals the node's positional path after a committed mutation.
//! - `children` insertion order is the sibling rank order.
//! - `done_explicit` marks a completion state set directly by the user, as
//!   opposed to one inherited from an ancestor toggle.

use crate::model::node_id::NodeId;
use std::time::{SystemTime, UNIX_EPOCH};

/// One node of the workflow tree.
///
/// There is no stored parent pointer: the parent id is always derivable from
/// `id` by dropping the last segment, which keeps ownership strictly
/// top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Positional identifier; maintained by the store's renumbering.
    pub id: NodeId,
    /// Schema label for this node's depth.
    pub type_label: String,
    /// Required short human-readable label.
    pub name: String,
    /// Optional one-line description.
    pub short_desc: String,
    /// Optional long-form description.
    pub full_desc: String,
    /// Optional deadline, ISO `YYYY-MM-DD`. Validated at the service boundary.
    pub deadline: Option<String>,
    /// Creation timestamp, epoch milliseconds.
    pub created_at: i64,
    /// Completion flag.
    pub done: bool,
    /// True when `done` was set directly on this node rather than inherited.
    pub done_explicit: bool,
    /// Exclusively owned children in sibling-rank order.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with a placeholder root id; the store renumbers it on
    /// attach.
    pub fn new(type_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::root(1),
            type_label: type_label.into(),
            name: name.into(),
            short_desc: String::new(),
            full_desc: String::new(),
            deadline: None,
            created_at: now_epoch_ms(),
            done: false,
            done_explicit: false,
            children: Vec::new(),
        }
    }

    /// Height of the subtree rooted here (1 = leaf).
    pub fn height(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Node::height)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Completion percentage, 0..=100.
    ///
    /// Leaves report 100 or 0 from `done`; composites report the integer mean
    /// of their children.
    pub fn progress(&self) -> u8 {
        if self.children.is_empty() {
            return if self.done { 100 } else { 0 };
        }
        let total: u32 = self
            .children
            .iter()
            .map(|child| u32::from(child.progress()))
            .sum();
        (total / self.children.len() as u32) as u8
    }
}

/// Current wall-clock time as epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
