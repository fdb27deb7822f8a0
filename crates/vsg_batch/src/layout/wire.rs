//! Layout payload handed to the execution engine.
//!
//! ```json
//! {
//!   "final_tracks": [
//!     { "track_id": 1, "source_key": "Source 2", "track_type": "audio",
//!       "config": { "is_default": true, "is_forced": false, "custom_lang": "jpn" } }
//!   ],
//!   "attachment_sources": ["Source 1"]
//! }
//! ```
//!
//! Track order is output order. Options at their defaults are left out.

use serde::Serialize;

use super::types::{FinalTrack, Layout, TrackConfig};
use crate::models::TrackType;

#[derive(Debug, Serialize)]
struct WireLayout<'a> {
    final_tracks: Vec<WireTrack<'a>>,
    attachment_sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct WireTrack<'a> {
    track_id: u32,
    source_key: String,
    track_type: TrackType,
    /// External files only; indexed sources are resolved by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    original_path: Option<&'a str>,
    config: WireConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireConfig<'a> {
    is_default: bool,
    is_forced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_to_source: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    perform_ocr: bool,
    #[serde(skip_serializing_if = "is_false")]
    convert_to_ass: bool,
    #[serde(skip_serializing_if = "is_false")]
    rescale: bool,
    #[serde(skip_serializing_if = "is_unit")]
    size_multiplier: f32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_unit(value: &f32) -> bool {
    (*value - 1.0).abs() < f32::EPSILON
}

impl<'a> From<&'a TrackConfig> for WireConfig<'a> {
    fn from(config: &'a TrackConfig) -> Self {
        Self {
            is_default: config.is_default,
            is_forced: config.is_forced,
            custom_name: config.effective_name(),
            custom_lang: config.effective_lang(),
            sync_to_source: config.sync_to_source.map(|s| s.key()),
            perform_ocr: config.perform_ocr,
            convert_to_ass: config.convert_to_ass,
            rescale: config.rescale,
            size_multiplier: config.size_multiplier,
        }
    }
}

impl<'a> From<&'a FinalTrack> for WireTrack<'a> {
    fn from(track: &'a FinalTrack) -> Self {
        Self {
            track_id: track.track.id,
            source_key: track.source.key(),
            track_type: track.track.track_type,
            original_path: track
                .is_external()
                .then_some(track.track.original_path.as_str()),
            config: WireConfig::from(&track.config),
        }
    }
}

impl Layout {
    /// Serialize to the engine payload.
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        let wire = WireLayout {
            final_tracks: self.final_tracks.iter().map(WireTrack::from).collect(),
            // BTreeSet iterates in source order.
            attachment_sources: self.attachment_sources.iter().map(|s| s.key()).collect(),
        };
        serde_json::to_string(&wire)
    }
}
