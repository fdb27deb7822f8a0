//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Type of media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
}

impl TrackType {
    /// Parse from an inspector type string ("video", "audio", "subtitles").
    ///
    /// Matching is case-insensitive and also accepts the singular "subtitle".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "subtitles" | "subtitle" => Some(Self::Subtitles),
            _ => None,
        }
    }

    /// Wire name, as used in the layout payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitles => "subtitles",
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TrackType::Video => "Video",
            TrackType::Audio => "Audio",
            TrackType::Subtitles => "Subtitles",
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction for reordering rows (queue jobs, layout tracks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Towards index 0.
    Up,
    Down,
}

impl MoveDirection {
    /// From a signed step: negative is up, positive is down.
    pub fn from_step(step: i32) -> Option<Self> {
        match step.signum() {
            -1 => Some(Self::Up),
            1 => Some(Self::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_inspector_names() {
        assert_eq!(TrackType::parse("video"), Some(TrackType::Video));
        assert_eq!(TrackType::parse("Audio"), Some(TrackType::Audio));
        assert_eq!(TrackType::parse("subtitles"), Some(TrackType::Subtitles));
        assert_eq!(TrackType::parse("subtitle"), Some(TrackType::Subtitles));
        assert_eq!(TrackType::parse("buttons"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TrackType::Subtitles).unwrap();
        assert_eq!(json, "\"subtitles\"");
    }

    #[test]
    fn move_direction_from_step() {
        assert_eq!(MoveDirection::from_step(-1), Some(MoveDirection::Up));
        assert_eq!(MoveDirection::from_step(1), Some(MoveDirection::Down));
        assert_eq!(MoveDirection::from_step(0), None);
    }
}
