//! Reversible mutation deltas.
//!
//! # Responsibility
//! - Capture the minimal state needed to replay one mutation in either
//!   direction.
//!
//! # Invariants
//! - A diff is self-contained: ids and positions inside it are valid against
//!   the tree state the diff was minted from (backward payloads) or produced
//!   (forward payloads). The LIFO discipline of the log guarantees diffs are
//!   only replayed against exactly those states.

use crate::model::node::Node;
use crate::model::node_id::NodeId;

/// Partial field state for edit replay. `None` = field not part of the edit;
/// `deadline` nests an option so a prior empty deadline can be restored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDelta {
    pub name: Option<String>,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    pub deadline: Option<Option<String>>,
}

impl FieldDelta {
    /// True when the delta carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_desc.is_none()
            && self.full_desc.is_none()
            && self.deadline.is_none()
    }
}

/// Completion-state change of a single node during a cascade toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleChange {
    pub id: NodeId,
    /// `(done, done_explicit)` before the toggle.
    pub before: (bool, bool),
    /// `(done, done_explicit)` after the toggle.
    pub after: (bool, bool),
}

/// One reversible mutation recorded by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diff {
    /// A node was appended under `parent` at 1-based `rank`.
    /// Backward = detach it; forward = re-attach the snapshot.
    Created {
        parent: Option<NodeId>,
        rank: u32,
        node: Node,
    },
    /// Fields changed in place; both directions carry only changed fields.
    Edited {
        id: NodeId,
        before: FieldDelta,
        after: FieldDelta,
    },
    /// A subtree was removed from `parent` at 1-based `rank`.
    /// Backward = re-attach the snapshot; forward = detach it again.
    Deleted {
        parent: Option<NodeId>,
        rank: u32,
        node: Node,
    },
    /// A subtree moved between parents. `from_id`/`old_*` describe the
    /// pre-move tree, `to_id`/`new_*` the post-move tree.
    Moved {
        from_id: NodeId,
        old_parent: Option<NodeId>,
        old_rank: u32,
        to_id: NodeId,
        new_parent: Option<NodeId>,
        new_rank: u32,
    },
    /// Cascade toggle; only nodes whose state actually changed are listed.
    Toggled { changes: Vec<ToggleChange> },
}
