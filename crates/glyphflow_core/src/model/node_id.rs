//! Segmented positional node identifiers.
//!
//! # Responsibility
//! - Define the `01.02.01` identifier type and its text format.
//! - Provide the rank arithmetic used by renumbering and diff replay.
//!
//! # Invariants
//! - Every segment is a 1-based rank; `0` is never a valid rank.
//! - Textual form is dot-delimited with segments zero-padded to two digits.
//! - `depth() == number of segments`; depth 1 marks a root node.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static ID_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid node id regex"));

/// Error returned when parsing a segmented identifier from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdParseError {
    /// Offending input text.
    pub input: String,
}

impl Display for NodeIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid node id `{}`; expected dot-separated positive segments like `01.02`",
            self.input
        )
    }
}

impl Error for NodeIdParseError {}

/// Positional identifier: the 1-based sibling rank at every depth.
///
/// The id fully encodes a node's position, so the parent id is always
/// derivable by dropping the last segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    segments: Vec<u32>,
}

impl NodeId {
    /// Creates a root-level id from a 1-based rank.
    pub fn root(rank: u32) -> Self {
        debug_assert!(rank >= 1);
        Self {
            segments: vec![rank],
        }
    }

    /// Creates an id from raw segments. Returns `None` on empty input or a
    /// zero rank.
    pub fn from_segments(segments: Vec<u32>) -> Option<Self> {
        if segments.is_empty() || segments.iter().any(|segment| *segment == 0) {
            return None;
        }
        Some(Self { segments })
    }

    /// Parses the dot-delimited text form.
    pub fn parse(text: &str) -> Result<Self, NodeIdParseError> {
        let trimmed = text.trim();
        if !ID_TEXT_RE.is_match(trimmed) {
            return Err(NodeIdParseError {
                input: text.to_string(),
            });
        }
        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            let rank: u32 = part.parse().map_err(|_| NodeIdParseError {
                input: text.to_string(),
            })?;
            if rank == 0 {
                return Err(NodeIdParseError {
                    input: text.to_string(),
                });
            }
            segments.push(rank);
        }
        Ok(Self { segments })
    }

    /// Raw rank segments, outermost first.
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Tree depth encoded by this id (1 = root).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this id addresses a root-level node.
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// 1-based rank among siblings (the last segment).
    pub fn last_rank(&self) -> u32 {
        *self
            .segments
            .last()
            .expect("NodeId is never constructed empty")
    }

    /// Parent id, or `None` for roots.
    pub fn parent(&self) -> Option<NodeId> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Child id under this node at the given 1-based rank.
    pub fn child(&self, rank: u32) -> NodeId {
        debug_assert!(rank >= 1);
        let mut segments = self.segments.clone();
        segments.push(rank);
        Self { segments }
    }

    /// True when `self` is `other` or one of its descendants.
    pub fn starts_with(&self, other: &NodeId) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }

    /// Adjusts this id for the removal of a sibling subtree.
    ///
    /// After the node at `removed_rank` under `removed_parent` has been
    /// detached and that level renumbered, any id passing through a later
    /// rank at that level shifts down by one. Ids inside the removed subtree
    /// must not be adjusted here (callers rule that out via cycle checks).
    pub fn shifted_after_removal(mut self, removed_parent: Option<&NodeId>, removed_rank: u32) -> NodeId {
        let prefix_len = removed_parent.map_or(0, |parent| parent.segments.len());
        let prefix_matches = match removed_parent {
            Some(parent) => self.starts_with(parent) && self.segments.len() > prefix_len,
            None => true,
        };
        if prefix_matches && self.segments[prefix_len] > removed_rank {
            self.segments[prefix_len] -= 1;
        }
        self
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment:02}")?;
        }
        Ok(())
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeId;

    #[test]
    fn parse_and_display_round_trip() {
        let id = NodeId::parse("01.02.01").unwrap();
        assert_eq!(id.segments(), &[1, 2, 1]);
        assert_eq!(id.to_string(), "01.02.01");
        assert_eq!(id.depth(), 3);
        assert_eq!(id.last_rank(), 1);
    }

    #[test]
    fn display_pads_segments_to_two_digits() {
        let id = NodeId::root(7).child(12).child(103);
        assert_eq!(id.to_string(), "07.12.103");
    }

    #[test]
    fn parse_rejects_zero_and_junk() {
        assert!(NodeId::parse("0").is_err());
        assert!(NodeId::parse("01.00").is_err());
        assert!(NodeId::parse("").is_err());
        assert!(NodeId::parse("01..02").is_err());
        assert!(NodeId::parse("a.b").is_err());
    }

    #[test]
    fn parent_and_child_navigation() {
        let id = NodeId::parse("02.03").unwrap();
        assert_eq!(id.parent(), Some(NodeId::root(2)));
        assert_eq!(NodeId::root(2).parent(), None);
        assert_eq!(id.child(1).to_string(), "02.03.01");
    }

    #[test]
    fn starts_with_covers_self_and_descendants() {
        let prefix = NodeId::parse("01.02").unwrap();
        assert!(NodeId::parse("01.02").unwrap().starts_with(&prefix));
        assert!(NodeId::parse("01.02.05").unwrap().starts_with(&prefix));
        assert!(!NodeId::parse("01.03").unwrap().starts_with(&prefix));
        assert!(!NodeId::parse("01").unwrap().starts_with(&prefix));
    }

    #[test]
    fn shifted_after_removal_decrements_later_ranks_only() {
        let removed_parent = NodeId::root(1);

        let later = NodeId::parse("01.03.02").unwrap();
        let shifted = later.shifted_after_removal(Some(&removed_parent), 2);
        assert_eq!(shifted.to_string(), "01.02.02");

        let earlier = NodeId::parse("01.01").unwrap();
        let unchanged = earlier.shifted_after_removal(Some(&removed_parent), 2);
        assert_eq!(unchanged.to_string(), "01.01");

        let elsewhere = NodeId::parse("02.05").unwrap();
        let untouched = elsewhere.shifted_after_removal(Some(&removed_parent), 2);
        assert_eq!(untouched.to_string(), "02.05");
    }

    #[test]
    fn shifted_after_removal_handles_root_level() {
        let root = NodeId::parse("03.01").unwrap();
        let shifted = root.shifted_after_removal(None, 2);
        assert_eq!(shifted.to_string(), "02.01");
    }
}
