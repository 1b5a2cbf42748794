//! Mutation engine use-case layer.
//!
//! # Responsibility
//! - Orchestrate store, schema and history into the engine's public API.
//! - Keep UI/CLI layers decoupled from tree internals.

pub mod tree_service;
