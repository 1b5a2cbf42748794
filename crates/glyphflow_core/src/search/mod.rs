//! Read-only search over the workflow tree.
//!
//! # Responsibility
//! - Expose name-substring and id-prefix queries for display collaborators.
//! - Keep result shaping (owned summaries) inside core.

pub mod query;
