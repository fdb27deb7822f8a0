//! Tracks as reported by the inspection service.

use serde::{Deserialize, Serialize};

use super::enums::TrackType;

fn default_lang() -> String {
    "und".to_string()
}

/// A selectable track inside one source file.
///
/// Produced by the track catalog for a single scan and never mutated
/// afterwards; layout edits live on `FinalTrack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTrack {
    /// Track ID within the container (mkvmerge numbering).
    pub id: u32,
    /// Type of track.
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// Codec identifier (e.g. "A_AAC", "V_MPEG4/ISO/AVC").
    #[serde(default)]
    pub codec_id: String,
    /// ISO 639-2 language code.
    #[serde(default = "default_lang")]
    pub language: String,
    /// Track name/title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_forced: bool,
    /// File the track lives in.
    #[serde(default)]
    pub original_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Set on fallback placeholders when the source could not be inspected.
    #[serde(default)]
    pub scan_unavailable: bool,
}

impl SourceTrack {
    /// Create a track with the required fields; everything else defaults.
    pub fn new(id: u32, track_type: TrackType, codec_id: impl Into<String>) -> Self {
        Self {
            id,
            track_type,
            codec_id: codec_id.into(),
            language: default_lang(),
            name: String::new(),
            is_default: false,
            is_forced: false,
            original_path: String::new(),
            channels: None,
            sample_rate: None,
            width: None,
            height: None,
            scan_unavailable: false,
        }
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        self.language = if lang.is_empty() {
            default_lang()
        } else {
            lang
        };
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.original_path = path.into();
        self
    }

    pub fn with_flags(mut self, is_default: bool, is_forced: bool) -> Self {
        self.is_default = is_default;
        self.is_forced = is_forced;
        self
    }

    /// One-line description for track lists.
    ///
    /// `Audio Track 1 (jpn) - Commentary, 2ch 48000Hz`
    pub fn description(&self) -> String {
        let mut out = format!(
            "{} Track {} ({})",
            self.track_type.label(),
            self.id,
            self.language
        );
        if !self.name.is_empty() {
            out.push_str(" - ");
            out.push_str(&self.name);
        }

        let detail = match self.track_type {
            TrackType::Video => match (self.width, self.height) {
                (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
                _ => None,
            },
            TrackType::Audio => match (self.channels, self.sample_rate) {
                (Some(c), Some(r)) => Some(format!("{}ch {}Hz", c, r)),
                (Some(c), None) => Some(format!("{}ch", c)),
                _ => None,
            },
            TrackType::Subtitles => None,
        };
        if let Some(detail) = detail {
            out.push_str(", ");
            out.push_str(&detail);
        }

        if self.scan_unavailable {
            out.push_str(" [scan unavailable]");
        }
        out
    }
}
