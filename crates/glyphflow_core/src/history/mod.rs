//! Diff-based mutation history.
//!
//! # Responsibility
//! - Define reversible diffs and the bounded undo/redo stacks.
//! - Leave diff application to the mutation engine, which replays through
//!   store primitives without re-recording.

pub mod diff;
pub mod undo_redo;
