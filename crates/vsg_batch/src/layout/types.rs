//! Layout data: which tracks go into the output, in what order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{SourceIndex, SourceRef, SourceTrack, TrackType};

/// Errors from layout commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error(
        "{track_type} tracks from {origin} cannot be added, only {reference} may provide video"
    )]
    BlockedTrack {
        track_type: TrackType,
        origin: SourceRef,
        reference: SourceIndex,
    },

    #[error("{origin} is not a source of this job")]
    UnknownSource { origin: SourceIndex },

    #[error("Layout has no tracks")]
    EmptyLayout,

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Per-track output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    #[serde(default)]
    pub is_default: bool,
    /// Forced display flag.
    #[serde(default)]
    pub is_forced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_lang: Option<String>,
    /// Source whose timing an external subtitle follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_to_source: Option<SourceIndex>,

    // Subtitle processing
    #[serde(default)]
    pub perform_ocr: bool,
    #[serde(default)]
    pub convert_to_ass: bool,
    #[serde(default)]
    pub rescale: bool,
    #[serde(default = "default_size_multiplier")]
    pub size_multiplier: f32,
}

fn default_size_multiplier() -> f32 {
    1.0
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            is_default: false,
            is_forced: false,
            custom_name: None,
            custom_lang: None,
            sync_to_source: None,
            perform_ocr: false,
            convert_to_ass: false,
            rescale: false,
            size_multiplier: default_size_multiplier(),
        }
    }
}

impl TrackConfig {
    /// Initial config for a newly selected track: flags copied from the
    /// source, no overrides.
    pub fn from_source_track(track: &SourceTrack) -> Self {
        Self {
            is_default: track.is_default,
            is_forced: track.is_forced,
            ..Self::default()
        }
    }

    /// Custom name, ignoring blank values.
    pub fn effective_name(&self) -> Option<&str> {
        self.custom_name.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Custom language, ignoring blank values and "und".
    pub fn effective_lang(&self) -> Option<&str> {
        self.custom_lang
            .as_deref()
            .filter(|s| !s.trim().is_empty() && *s != "und")
    }
}

/// A source track placed in the output list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalTrack {
    pub track: SourceTrack,
    pub source: SourceRef,
    pub config: TrackConfig,
}

impl FinalTrack {
    pub fn new(track: SourceTrack, source: SourceRef) -> Self {
        let config = TrackConfig::from_source_track(&track);
        Self {
            track,
            source,
            config,
        }
    }

    pub fn track_type(&self) -> TrackType {
        self.track.track_type
    }

    pub fn is_external(&self) -> bool {
        self.source.is_external()
    }
}

/// The configured output of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Output order.
    #[serde(default)]
    pub final_tracks: Vec<FinalTrack>,
    /// Sources whose attachments are carried over.
    #[serde(default)]
    pub attachment_sources: BTreeSet<SourceIndex>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.final_tracks.is_empty()
    }

    pub fn track_count(&self) -> usize {
        self.final_tracks.len()
    }

    /// Count of tracks per type, for queue display.
    pub fn count_by_type(&self, track_type: TrackType) -> usize {
        self.final_tracks
            .iter()
            .filter(|t| t.track_type() == track_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_final_track_copies_source_flags() {
        let source = SourceTrack::new(2, TrackType::Subtitles, "S_TEXT/ASS").with_flags(true, true);
        let ft = FinalTrack::new(source, SourceIndex::new(1).into());

        assert!(ft.config.is_default);
        assert!(ft.config.is_forced);
        assert_eq!(ft.config.custom_name, None);
        assert_eq!(ft.config.custom_lang, None);
        assert_eq!(ft.config.size_multiplier, 1.0);
    }

    #[test]
    fn effective_overrides_skip_blank_and_und() {
        let config = TrackConfig {
            custom_name: Some("  ".to_string()),
            custom_lang: Some("und".to_string()),
            ..TrackConfig::default()
        };
        assert_eq!(config.effective_name(), None);
        assert_eq!(config.effective_lang(), None);

        let config = TrackConfig {
            custom_name: Some("Signs".to_string()),
            custom_lang: Some("eng".to_string()),
            ..TrackConfig::default()
        };
        assert_eq!(config.effective_name(), Some("Signs"));
        assert_eq!(config.effective_lang(), Some("eng"));
    }

    #[test]
    fn blocked_error_message() {
        let err = LayoutError::BlockedTrack {
            track_type: TrackType::Video,
            origin: SourceIndex::new(1).into(),
            reference: SourceIndex::reference(),
        };
        assert_eq!(
            err.to_string(),
            "video tracks from Source 2 cannot be added, only Source 1 may provide video"
        );

        let err = LayoutError::UnknownSource {
            origin: SourceIndex::new(8),
        };
        assert_eq!(err.to_string(), "Source 9 is not a source of this job");
    }
}
