//! Owning store for the workflow forest.
//!
//! # Responsibility
//! - Own every node and resolve positional ids to nodes.
//! - Restore gap-free sibling numbering after structural edits.
//!
//! # Invariants
//! - Between mutations, every node's id equals its positional path and its
//!   type label equals the schema label for its depth.
//! - `attach`/`detach` leave numbering to the caller; a structural edit is
//!   complete only after `renumber_level` ran on every affected level.

use crate::model::node::Node;
use crate::model::node_id::NodeId;
use crate::schema::NodeSchema;

/// Flat owner of all root nodes; children are owned transitively.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeStore {
    roots: Vec<Node>,
}

impl NodeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-shaped roots, renumbering every id and
    /// type label from rank alone. Used by persistence load.
    pub fn from_roots(roots: Vec<Node>, schema: &NodeSchema) -> Self {
        let mut store = Self { roots };
        store.relabel_all(schema);
        store
    }

    /// Root-level nodes in rank order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Whether no nodes exist.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    /// Maximum occupied depth across the forest (0 when empty).
    pub fn max_depth(&self) -> usize {
        self.roots.iter().map(Node::height).max().unwrap_or(0)
    }

    /// Resolves a node by walking its rank segments.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        let mut segments = id.segments().iter();
        let first = *segments.next()?;
        let mut current = self.roots.get(first.checked_sub(1)? as usize)?;
        for rank in segments {
            current = current.children.get(rank.checked_sub(1)? as usize)?;
        }
        Some(current)
    }

    /// Mutable counterpart of [`NodeStore::node`].
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let mut segments = id.segments().iter();
        let first = *segments.next()?;
        let mut current = self.roots.get_mut(first.checked_sub(1)? as usize)?;
        for rank in segments {
            current = current.children.get_mut(rank.checked_sub(1)? as usize)?;
        }
        Some(current)
    }

    /// Whether the id resolves to a node.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of children under `parent` (or roots when `None`).
    pub fn child_count(&self, parent: Option<&NodeId>) -> usize {
        match parent {
            Some(id) => self.node(id).map_or(0, |node| node.children.len()),
            None => self.roots.len(),
        }
    }

    /// Canonical traversal: depth-first, sibling-rank order.
    pub fn iter_depth_first(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            push_depth_first(root, &mut out);
        }
        out
    }

    /// Inserts `node` under `parent` (roots when `None`) at the 0-based
    /// position `at`, clamped to the list length. Returns false when the
    /// parent does not resolve.
    ///
    /// Ids are not recomputed here; callers must renumber the level.
    pub fn attach(&mut self, parent: Option<&NodeId>, node: Node, at: Option<usize>) -> bool {
        let list = match parent {
            Some(id) => match self.node_mut(id) {
                Some(parent_node) => &mut parent_node.children,
                None => return false,
            },
            None => &mut self.roots,
        };
        let index = at.unwrap_or(list.len()).min(list.len());
        list.insert(index, node);
        true
    }

    /// Removes and returns the subtree at `id`.
    ///
    /// Ids are not recomputed here; callers must renumber the level.
    pub fn detach(&mut self, id: &NodeId) -> Option<Node> {
        if !self.contains(id) {
            return None;
        }
        let rank_index = (id.last_rank() - 1) as usize;
        match id.parent() {
            Some(parent_id) => {
                let parent = self.node_mut(&parent_id)?;
                if rank_index >= parent.children.len() {
                    return None;
                }
                Some(parent.children.remove(rank_index))
            }
            None => {
                if rank_index >= self.roots.len() {
                    return None;
                }
                Some(self.roots.remove(rank_index))
            }
        }
    }

    /// Reassigns positional ids and schema type labels for every child of
    /// `parent` (or every root) and their entire subtrees.
    pub fn renumber_level(&mut self, parent: Option<&NodeId>, schema: &NodeSchema) {
        match parent {
            Some(parent_id) => {
                let base = parent_id.clone();
                if let Some(parent_node) = self.node_mut(parent_id) {
                    renumber_children(parent_node, &base, schema);
                }
            }
            None => {
                for (index, root) in self.roots.iter_mut().enumerate() {
                    let id = NodeId::root(index as u32 + 1);
                    relabel_subtree(root, id, schema);
                }
            }
        }
    }

    /// Normalizes the whole forest: ids from rank, type labels from depth.
    pub fn relabel_all(&mut self, schema: &NodeSchema) {
        self.renumber_level(None, schema);
    }
}

fn push_depth_first<'tree>(node: &'tree Node, out: &mut Vec<&'tree Node>) {
    out.push(node);
    for child in &node.children {
        push_depth_first(child, out);
    }
}

fn renumber_children(parent: &mut Node, parent_id: &NodeId, schema: &NodeSchema) {
    for (index, child) in parent.children.iter_mut().enumerate() {
        let child_id = parent_id.child(index as u32 + 1);
        relabel_subtree(child, child_id, schema);
    }
}

fn relabel_subtree(node: &mut Node, id: NodeId, schema: &NodeSchema) {
    if let Some(label) = schema.label_at(id.depth()) {
        node.type_label = label.to_string();
    }
    node.id = id;
    let base = node.id.clone();
    renumber_children(node, &base, schema);
}
