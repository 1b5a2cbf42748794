//! Domain model for the workflow tree.
//!
//! # Responsibility
//! - Define the node record and its positional identifier type.
//! - Keep a single canonical shape shared by the engine, search and
//!   persistence layers.
//!
//! # Invariants
//! - Node identity is positional: the id is derived from tree shape, never
//!   assigned out-of-band.

pub mod node;
pub mod node_id;
