//! Data models shared by every batch component.
//!
//! - Track type enum (video, audio, subtitles) and row move direction
//! - Source identification (`SourceIndex`, `SourceRef`)
//! - Source tracks as reported by the track catalog

mod enums;
mod media;
mod source_index;

pub use enums::{MoveDirection, TrackType};
pub use media::SourceTrack;
pub use source_index::{SourceIndex, SourceRef};
