//! Workflow tree mutation engine.
//!
//! # Responsibility
//! - Validate and commit schema-checked mutations over the node store.
//! - Record one reversible diff per committed mutation and replay diffs for
//!   undo/redo through the same store primitives.
//!
//! # Invariants
//! - Validate-then-commit: a failed operation leaves the tree untouched.
//! - After every committed mutation, sibling numbering is gap-free and every
//!   type label matches the schema label for its depth.
//! - Diff replay never records new diffs.

use crate::history::diff::{Diff, FieldDelta, ToggleChange};
use crate::history::undo_redo::{UndoRedoLog, DEFAULT_HISTORY_LIMIT};
use crate::model::node::Node;
use crate::model::node_id::NodeId;
use crate::schema::{NodeSchema, SchemaLabelError};
use crate::search::query::name_matcher;
use crate::store::node_store::NodeStore;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DEADLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid deadline regex"));

/// Typed failures of the mutation engine. All recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// New schema length must equal the current maximum occupied depth.
    SchemaDepthMismatch { expected: usize, got: usize },
    /// Schema label list was empty.
    EmptySchema,
    /// The same label appeared at two schema depths.
    DuplicateSchemaLabel(String),
    /// Referenced parent id does not resolve.
    InvalidParent(NodeId),
    /// Operation would place a node below the schema's maximum depth.
    DepthExceeded { limit: usize },
    /// Caller-supplied type does not match the schema label for the depth.
    TypeMismatch { expected: String, got: String },
    /// Referenced node id does not resolve.
    NodeNotFound(NodeId),
    /// Root-level nodes cannot be moved.
    RootProtected(NodeId),
    /// Move target is the node itself or one of its descendants.
    CyclicMove { node: NodeId, target: NodeId },
    /// Move target is already the node's parent.
    AlreadyUnderParent { node: NodeId },
    /// Name is blank after trimming.
    InvalidName,
    /// Deadline is not an ISO `YYYY-MM-DD` date.
    InvalidDeadline(String),
    /// Undo stack is empty.
    NothingToUndo,
    /// Redo stack is empty.
    NothingToRedo,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaDepthMismatch { expected, got } => write!(
                f,
                "schema must keep the tree's occupied depth {expected}, got {got} labels"
            ),
            Self::EmptySchema => write!(f, "schema needs at least one type label"),
            Self::DuplicateSchemaLabel(label) => {
                write!(f, "schema label `{label}` appears more than once")
            }
            Self::InvalidParent(id) => write!(f, "parent not found: {id}"),
            Self::DepthExceeded { limit } => {
                write!(f, "operation exceeds the schema depth limit of {limit}")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "expected type `{expected}` at this level, got `{got}`")
            }
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::RootProtected(id) => write!(f, "root node {id} cannot be moved"),
            Self::CyclicMove { node, target } => {
                write!(f, "cannot move {node} under its own subtree at {target}")
            }
            Self::AlreadyUnderParent { node } => {
                write!(f, "node {node} is already under the requested parent")
            }
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::InvalidDeadline(value) => {
                write!(f, "invalid deadline `{value}`; expected YYYY-MM-DD")
            }
            Self::NothingToUndo => write!(f, "nothing to undo"),
            Self::NothingToRedo => write!(f, "nothing to redo"),
        }
    }
}

impl Error for TreeError {}

impl From<SchemaLabelError> for TreeError {
    fn from(value: SchemaLabelError) -> Self {
        match value {
            SchemaLabelError::Empty => Self::EmptySchema,
            SchemaLabelError::Duplicate(label) => Self::DuplicateSchemaLabel(label),
        }
    }
}

/// Parameters for [`TreeService::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    /// Parent id; `None` creates a root-level node.
    pub parent: Option<NodeId>,
    /// Caller-declared type; must equal the schema label for the depth.
    pub type_label: String,
    /// Required display name.
    pub name: String,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    /// Optional ISO `YYYY-MM-DD` deadline.
    pub deadline: Option<String>,
}

impl CreateRequest {
    /// Creates a root-level request with just a type and name.
    pub fn new(type_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Targets a parent node instead of the root level.
    pub fn under(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Partial field update for [`TreeService::edit`]. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub name: Option<String>,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    pub deadline: Option<String>,
}

enum ReplayDirection {
    Forward,
    Backward,
}

/// The mutation engine: owns the store, the active schema and the history.
///
/// External callers only ever receive immutable borrows or owned summaries;
/// all structural change flows through the methods below.
pub struct TreeService {
    store: NodeStore,
    schema: NodeSchema,
    history: UndoRedoLog,
}

impl Default for TreeService {
    fn default() -> Self {
        Self::new(NodeSchema::default(), DEFAULT_HISTORY_LIMIT)
    }
}

impl TreeService {
    /// Creates an empty engine with the given schema and history cap.
    pub fn new(schema: NodeSchema, history_limit: usize) -> Self {
        Self {
            store: NodeStore::new(),
            schema,
            history: UndoRedoLog::new(history_limit),
        }
    }

    /// Builds an engine from pre-shaped roots (the persistence load path).
    ///
    /// Every id and type label is recomputed from rank alone, so a file that
    /// was hand-edited or written by an older build still normalizes.
    pub fn from_roots(roots: Vec<Node>, schema: NodeSchema, history_limit: usize) -> Self {
        Self {
            store: NodeStore::from_roots(roots, &schema),
            schema,
            history: UndoRedoLog::new(history_limit),
        }
    }

    // --- mutation API --------------------------------------------------

    /// Creates a node as the last child of `parent` (or a new root).
    pub fn create(&mut self, request: &CreateRequest) -> Result<NodeId, TreeError> {
        let name = normalize_name(&request.name)?;
        let deadline = validate_deadline(request.deadline.as_deref())?;

        let parent_depth = match &request.parent {
            Some(parent_id) => match self.store.node(parent_id) {
                Some(_) => parent_id.depth(),
                None => return Err(TreeError::InvalidParent(parent_id.clone())),
            },
            None => 0,
        };
        let expected = match self.schema.expected_child_type(parent_depth) {
            Some(label) => label.to_string(),
            None => {
                return Err(TreeError::DepthExceeded {
                    limit: self.schema.max_depth(),
                })
            }
        };
        if request.type_label != expected {
            return Err(TreeError::TypeMismatch {
                expected,
                got: request.type_label.clone(),
            });
        }

        let rank = self.store.child_count(request.parent.as_ref()) as u32 + 1;
        let id = match &request.parent {
            Some(parent_id) => parent_id.child(rank),
            None => NodeId::root(rank),
        };

        let mut node = Node::new(expected, name);
        node.id = id.clone();
        node.short_desc = request.short_desc.clone().unwrap_or_default();
        node.full_desc = request.full_desc.clone().unwrap_or_default();
        node.deadline = deadline;
        let snapshot = node.clone();

        self.store.attach(request.parent.as_ref(), node, None);
        self.store
            .renumber_level(request.parent.as_ref(), &self.schema);
        self.history.record(Diff::Created {
            parent: request.parent.clone(),
            rank,
            node: snapshot,
        });

        debug!("event=node_created module=core id={id} type={}", request.type_label);
        Ok(id)
    }

    /// Applies a partial field update; records only fields that changed.
    pub fn edit(&mut self, id: &NodeId, request: &EditRequest) -> Result<(), TreeError> {
        let name = match &request.name {
            Some(value) => Some(normalize_name(value)?),
            None => None,
        };
        let deadline = validate_deadline(request.deadline.as_deref())?;

        let node = self
            .store
            .node_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;

        let mut before = FieldDelta::default();
        let mut after = FieldDelta::default();

        if let Some(new_name) = name {
            if node.name != new_name {
                before.name = Some(std::mem::replace(&mut node.name, new_name.clone()));
                after.name = Some(new_name);
            }
        }
        if let Some(new_short) = &request.short_desc {
            if node.short_desc != *new_short {
                before.short_desc = Some(std::mem::replace(&mut node.short_desc, new_short.clone()));
                after.short_desc = Some(new_short.clone());
            }
        }
        if let Some(new_full) = &request.full_desc {
            if node.full_desc != *new_full {
                before.full_desc = Some(std::mem::replace(&mut node.full_desc, new_full.clone()));
                after.full_desc = Some(new_full.clone());
            }
        }
        if request.deadline.is_some() && node.deadline != deadline {
            before.deadline = Some(std::mem::replace(&mut node.deadline, deadline.clone()));
            after.deadline = Some(deadline);
        }

        if !after.is_empty() {
            self.history.record(Diff::Edited {
                id: id.clone(),
                before,
                after,
            });
            debug!("event=node_edited module=core id={id}");
        }
        Ok(())
    }

    /// Removes a node and its entire subtree; returns the detached subtree.
    pub fn delete(&mut self, id: &NodeId) -> Result<Node, TreeError> {
        let parent = id.parent();
        let rank = id.last_rank();
        let removed = self
            .store
            .detach(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        self.store.renumber_level(parent.as_ref(), &self.schema);
        self.history.record(Diff::Deleted {
            parent,
            rank,
            node: removed.clone(),
        });

        debug!("event=node_deleted module=core id={id} subtree_len={}", removed.subtree_len());
        Ok(removed)
    }

    /// Moves a subtree under a new parent (`None` = root level), appending it
    /// as the last sibling. The whole subtree is renumbered and relabelled.
    pub fn move_node(&mut self, id: &NodeId, new_parent: Option<&NodeId>) -> Result<(), TreeError> {
        let height = self
            .store
            .node(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?
            .height();
        if id.is_root() {
            return Err(TreeError::RootProtected(id.clone()));
        }
        if let Some(target_id) = new_parent {
            if !self.store.contains(target_id) {
                return Err(TreeError::InvalidParent(target_id.clone()));
            }
            if target_id.starts_with(id) {
                return Err(TreeError::CyclicMove {
                    node: id.clone(),
                    target: target_id.clone(),
                });
            }
        }
        let current_parent = id.parent();
        if new_parent == current_parent.as_ref() {
            return Err(TreeError::AlreadyUnderParent { node: id.clone() });
        }
        let target_depth = new_parent.map_or(0, NodeId::depth);
        if target_depth + height > self.schema.max_depth() {
            return Err(TreeError::DepthExceeded {
                limit: self.schema.max_depth(),
            });
        }

        let from_id = id.clone();
        let old_parent = current_parent;
        let old_rank = id.last_rank();
        let Some(node) = self.store.detach(id) else {
            return Err(TreeError::NodeNotFound(id.clone()));
        };
        self.store.renumber_level(old_parent.as_ref(), &self.schema);

        // The target id may have shifted when the detached subtree sat
        // earlier in the same child list.
        let target = new_parent
            .cloned()
            .map(|parent| parent.shifted_after_removal(old_parent.as_ref(), old_rank));
        let new_rank = self.store.child_count(target.as_ref()) as u32 + 1;
        self.store.attach(target.as_ref(), node, None);
        self.store.renumber_level(target.as_ref(), &self.schema);

        let to_id = match &target {
            Some(parent) => parent.child(new_rank),
            None => NodeId::root(new_rank),
        };
        debug!("event=node_moved module=core from={from_id} to={to_id}");
        self.history.record(Diff::Moved {
            from_id,
            old_parent,
            old_rank,
            to_id,
            new_parent: target,
            new_rank,
        });
        Ok(())
    }

    /// Flips the target's completion state and cascades it to descendants
    /// that never had their state set directly. Returns the new status.
    pub fn toggle(&mut self, id: &NodeId) -> Result<bool, TreeError> {
        let node = self
            .store
            .node_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        let new_status = !node.done;

        let mut changes = Vec::new();
        let before = (node.done, node.done_explicit);
        node.done = new_status;
        node.done_explicit = true;
        let after = (node.done, node.done_explicit);
        if before != after {
            changes.push(ToggleChange {
                id: id.clone(),
                before,
                after,
            });
        }
        cascade_done(node, new_status, &mut changes);

        if !changes.is_empty() {
            self.history.record(Diff::Toggled { changes });
        }
        debug!("event=node_toggled module=core id={id} done={new_status}");
        Ok(new_status)
    }

    /// Replaces the active schema, relabelling every node positionally.
    ///
    /// Succeeds unconditionally on an empty store; otherwise the label count
    /// must equal the current maximum occupied depth. Not recorded in history.
    pub fn set_schema(&mut self, labels: Vec<String>) -> Result<(), TreeError> {
        let schema = NodeSchema::new(labels)?;
        if !self.store.is_empty() {
            let occupied = self.store.max_depth();
            if schema.max_depth() != occupied {
                return Err(TreeError::SchemaDepthMismatch {
                    expected: occupied,
                    got: schema.max_depth(),
                });
            }
        }
        self.schema = schema;
        self.store.relabel_all(&self.schema);
        debug!("event=schema_switched module=core depth={}", self.schema.max_depth());
        Ok(())
    }

    // --- history API ---------------------------------------------------

    /// Reverts the newest recorded mutation.
    pub fn undo(&mut self) -> Result<(), TreeError> {
        let diff = self.history.take_undo().ok_or(TreeError::NothingToUndo)?;
        self.apply_diff(&diff, ReplayDirection::Backward);
        self.history.push_redo(diff);
        Ok(())
    }

    /// Reapplies the newest undone mutation.
    pub fn redo(&mut self) -> Result<(), TreeError> {
        let diff = self.history.take_redo().ok_or(TreeError::NothingToRedo)?;
        self.apply_diff(&diff, ReplayDirection::Forward);
        self.history.push_undo(diff);
        Ok(())
    }

    /// Whether an undo target exists.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo target exists.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- query API (read-only) ----------------------------------------

    /// Resolves a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    /// Root-level nodes in rank order.
    pub fn roots(&self) -> &[Node] {
        self.store.roots()
    }

    /// Canonical traversal: depth-first, sibling-rank order.
    pub fn iter_depth_first(&self) -> Vec<&Node> {
        self.store.iter_depth_first()
    }

    /// Nodes whose name contains `query`, case-insensitively.
    pub fn find_by_name(&self, query: &str) -> Vec<&Node> {
        let Some(matcher) = name_matcher(query) else {
            return Vec::new();
        };
        self.store
            .iter_depth_first()
            .into_iter()
            .filter(|node| matcher.is_match(&node.name))
            .collect()
    }

    /// The node at `prefix` plus all of its descendants.
    pub fn find_by_id_prefix(&self, prefix: &NodeId) -> Vec<&Node> {
        self.store
            .iter_depth_first()
            .into_iter()
            .filter(|node| node.id.starts_with(prefix))
            .collect()
    }

    /// Active schema.
    pub fn schema(&self) -> &NodeSchema {
        &self.schema
    }

    /// Read-only view of the store, for persistence and export collaborators.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Maximum occupied depth (0 when empty).
    pub fn max_depth(&self) -> usize {
        self.store.max_depth()
    }

    // --- diff replay ---------------------------------------------------

    fn apply_diff(&mut self, diff: &Diff, direction: ReplayDirection) {
        match diff {
            Diff::Created { parent, rank, node } => match direction {
                ReplayDirection::Backward => self.replay_detach(&position_id(parent, *rank)),
                ReplayDirection::Forward => self.replay_attach(parent, *rank, node.clone()),
            },
            Diff::Deleted { parent, rank, node } => match direction {
                ReplayDirection::Backward => self.replay_attach(parent, *rank, node.clone()),
                ReplayDirection::Forward => self.replay_detach(&position_id(parent, *rank)),
            },
            Diff::Edited { id, before, after } => {
                let delta = match direction {
                    ReplayDirection::Backward => before,
                    ReplayDirection::Forward => after,
                };
                self.replay_fields(id, delta);
            }
            Diff::Moved {
                from_id,
                old_parent,
                old_rank,
                to_id,
                new_parent,
                new_rank,
            } => match direction {
                ReplayDirection::Backward => self.replay_move(to_id, old_parent, *old_rank),
                ReplayDirection::Forward => self.replay_move(from_id, new_parent, *new_rank),
            },
            Diff::Toggled { changes } => {
                for change in changes {
                    let (done, done_explicit) = match direction {
                        ReplayDirection::Backward => change.before,
                        ReplayDirection::Forward => change.after,
                    };
                    match self.store.node_mut(&change.id) {
                        Some(node) => {
                            node.done = done;
                            node.done_explicit = done_explicit;
                        }
                        None => warn!("event=replay_skip module=core op=toggle id={}", change.id),
                    }
                }
            }
        }
    }

    fn replay_attach(&mut self, parent: &Option<NodeId>, rank: u32, node: Node) {
        let at = rank.saturating_sub(1) as usize;
        if !self.store.attach(parent.as_ref(), node, Some(at)) {
            warn!("event=replay_skip module=core op=attach rank={rank}");
            return;
        }
        self.store.renumber_level(parent.as_ref(), &self.schema);
    }

    fn replay_detach(&mut self, id: &NodeId) {
        let parent = id.parent();
        if self.store.detach(id).is_none() {
            warn!("event=replay_skip module=core op=detach id={id}");
            return;
        }
        self.store.renumber_level(parent.as_ref(), &self.schema);
    }

    fn replay_fields(&mut self, id: &NodeId, delta: &FieldDelta) {
        let Some(node) = self.store.node_mut(id) else {
            warn!("event=replay_skip module=core op=edit id={id}");
            return;
        };
        if let Some(name) = &delta.name {
            node.name = name.clone();
        }
        if let Some(short_desc) = &delta.short_desc {
            node.short_desc = short_desc.clone();
        }
        if let Some(full_desc) = &delta.full_desc {
            node.full_desc = full_desc.clone();
        }
        if let Some(deadline) = &delta.deadline {
            node.deadline = deadline.clone();
        }
    }

    /// Replays one leg of a move. The recorded target parent id is already
    /// expressed in post-detach coordinates: forward targets were computed
    /// after the original detach, and backward targets stay stable because
    /// the moved node was appended as the last sibling.
    fn replay_move(&mut self, id: &NodeId, target_parent: &Option<NodeId>, target_rank: u32) {
        let source_parent = id.parent();
        let Some(node) = self.store.detach(id) else {
            warn!("event=replay_skip module=core op=move id={id}");
            return;
        };
        self.store.renumber_level(source_parent.as_ref(), &self.schema);
        let at = target_rank.saturating_sub(1) as usize;
        if !self.store.attach(target_parent.as_ref(), node, Some(at)) {
            warn!("event=replay_skip module=core op=move_attach id={id}");
            return;
        }
        self.store.renumber_level(target_parent.as_ref(), &self.schema);
    }
}

fn position_id(parent: &Option<NodeId>, rank: u32) -> NodeId {
    match parent {
        Some(parent_id) => parent_id.child(rank),
        None => NodeId::root(rank),
    }
}

fn cascade_done(node: &mut Node, value: bool, changes: &mut Vec<ToggleChange>) {
    for child in &mut node.children {
        if !child.done_explicit && child.done != value {
            changes.push(ToggleChange {
                id: child.id.clone(),
                before: (child.done, false),
                after: (value, false),
            });
            child.done = value;
        }
        cascade_done(child, value, changes);
    }
}

fn normalize_name(value: &str) -> Result<String, TreeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn validate_deadline(value: Option<&str>) -> Result<Option<String>, TreeError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if DEADLINE_RE.is_match(trimmed) {
                Ok(Some(trimmed.to_string()))
            } else {
                Err(TreeError::InvalidDeadline(raw.to_string()))
            }
        }
    }
}
