//! VSG Batch - job queue and track layout orchestration for Video Sync GUI.
//!
//! This crate holds the batch side of the application with zero UI
//! dependencies: the job/track data model, the layout rules that decide which
//! tracks may be combined, the layout clipboard, and the sequential batch
//! runner that drives an external merge engine.
//!
//! Presentation layers talk to it through a [`session::Session`] and the
//! command methods on [`layout::LayoutEngine`].

pub mod catalog;
pub mod config;
pub mod jobs;
pub mod layout;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
