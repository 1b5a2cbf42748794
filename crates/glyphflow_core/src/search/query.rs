//! Search query execution over the canonical traversal.
//!
//! # Responsibility
//! - Resolve nodes by case-insensitive name substring or by id prefix.
//! - Return owned summaries so callers never hold aliases into the tree.
//!
//! # Invariants
//! - Results follow depth-first, sibling-rank order.
//! - A blank query matches nothing.

use crate::model::node::Node;
use crate::model::node_id::NodeId;
use regex::{Regex, RegexBuilder};

/// What a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive substring of the node name.
    Name,
    /// Exact id or id prefix (`01.02` matches `01.02` and `01.02.*`).
    Id,
}

/// Compact owned summary of one matching node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Formatted segmented id, e.g. `01.02.01`.
    pub id: String,
    pub name: String,
    pub type_label: String,
    pub done: bool,
    pub deadline: Option<String>,
}

impl SearchHit {
    fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            name: node.name.clone(),
            type_label: node.type_label.clone(),
            done: node.done,
            deadline: node.deadline.clone(),
        }
    }
}

/// Builds a case-insensitive substring matcher for a name query.
///
/// Returns `None` for blank queries. The query text is escaped, so regex
/// metacharacters in user input match literally.
pub fn name_matcher(query: &str) -> Option<Regex> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Runs a search over the forest and returns summaries in canonical order.
pub fn search_nodes(roots: &[Node], mode: SearchMode, query: &str) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    match mode {
        SearchMode::Name => {
            let Some(matcher) = name_matcher(query) else {
                return hits;
            };
            collect(roots, &mut hits, &|node| matcher.is_match(&node.name));
        }
        SearchMode::Id => {
            let Ok(prefix) = NodeId::parse(query) else {
                return hits;
            };
            collect(roots, &mut hits, &|node| node.id.starts_with(&prefix));
        }
    }
    hits
}

fn collect(nodes: &[Node], out: &mut Vec<SearchHit>, predicate: &dyn Fn(&Node) -> bool) {
    for node in nodes {
        if predicate(node) {
            out.push(SearchHit::from_node(node));
        }
        collect(&node.children, out, predicate);
    }
}
