//! Tree persistence boundary.
//!
//! # Responsibility
//! - Round-trip the forest through a JSON document.
//! - Guarantee ids rebuild deterministically from sibling rank alone.

pub mod json_io;
