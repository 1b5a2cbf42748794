//! Node ownership and identifier allocation.
//!
//! # Responsibility
//! - Own the forest and resolve positional ids.
//! - Keep sibling numbering gap-free after every structural edit.

pub mod node_store;
