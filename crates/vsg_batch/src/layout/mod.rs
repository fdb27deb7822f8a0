//! Track layout: selection rules, ordering, and the engine payload.
//!
//! - [`LayoutEngine`]: editing session for one job (add/remove/move tracks,
//!   attachments, external subtitles, finalize)
//! - [`Layout`], [`FinalTrack`], [`TrackConfig`]: the stored result
//! - `Layout::to_wire_json`: the JSON handed to the execution engine

mod engine;
mod types;
mod wire;

pub use engine::LayoutEngine;
pub use types::{FinalTrack, Layout, LayoutError, TrackConfig};
