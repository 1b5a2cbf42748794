//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `glyphflow_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use glyphflow_core::{CreateRequest, TreeService};

fn main() {
    println!("glyphflow_core version={}", glyphflow_core::core_version());

    let mut service = TreeService::default();
    if let Ok(id) = service.create(&CreateRequest::new("Project", "Smoke probe")) {
        println!("glyphflow_core first_root={id}");
    }
}
