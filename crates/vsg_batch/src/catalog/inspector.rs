//! Media inspection: path in, track list out.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use thiserror::Error;

use crate::models::{SourceTrack, TrackType};

/// Errors from the inspection service.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Track scan unavailable: {0}")]
    ScanUnavailable(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    #[error("Failed to parse inspector output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reports the tracks inside one media file.
pub trait MediaInspector: Send + Sync {
    /// Whether the service can be used at all (tool installed, etc.).
    fn is_available(&self) -> bool {
        true
    }

    fn inspect(&self, path: &Path) -> Result<Vec<SourceTrack>, CatalogError>;
}

/// Inspector backed by `mkvmerge -J`.
#[derive(Debug, Clone)]
pub struct MkvmergeInspector {
    program: PathBuf,
}

impl Default for MkvmergeInspector {
    fn default() -> Self {
        Self {
            program: PathBuf::from("mkvmerge"),
        }
    }
}

impl MkvmergeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific mkvmerge binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MediaInspector for MkvmergeInspector {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn inspect(&self, path: &Path) -> Result<Vec<SourceTrack>, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Inspecting {}", path.display());

        let output = Command::new(&self.program)
            .arg("-J")
            .arg(path)
            .output()
            .map_err(|e| CatalogError::ScanUnavailable(format!("Failed to run mkvmerge: {}", e)))?;

        if !output.status.success() {
            return Err(CatalogError::CommandFailed {
                tool: "mkvmerge".to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        Ok(parse_mkvmerge_json(&json, path))
    }
}

/// Convert `mkvmerge -J` output into source tracks.
///
/// Tracks with an unknown type (buttons, etc.) are skipped.
pub fn parse_mkvmerge_json(json: &Value, path: &Path) -> Vec<SourceTrack> {
    let original_path = path.to_string_lossy().to_string();

    json.get("tracks")
        .and_then(|t| t.as_array())
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|track| parse_track(track, &original_path))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_track(track: &Value, original_path: &str) -> Option<SourceTrack> {
    let track_type = TrackType::parse(track.get("type")?.as_str()?)?;
    let id = u32::try_from(track.get("id")?.as_u64()?).ok()?;

    let props = track.get("properties");
    let str_prop = |key: &str| {
        props
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };
    let bool_prop = |key: &str| {
        props
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    };

    let mut out = SourceTrack::new(id, track_type, str_prop("codec_id"))
        .with_language(str_prop("language"))
        .with_name(str_prop("track_name"))
        .with_flags(bool_prop("default_track"), bool_prop("forced_track"))
        .with_path(original_path);

    let Some(p) = props else {
        return Some(out);
    };

    match track_type {
        TrackType::Video => {
            let dims = p.get("pixel_dimensions").and_then(|d| d.as_str());
            out.width = dims
                .and_then(|s| s.split('x').next())
                .and_then(|w| w.parse().ok());
            out.height = dims
                .and_then(|s| s.split('x').nth(1))
                .and_then(|h| h.parse().ok());
        }
        TrackType::Audio => {
            out.channels = p
                .get("audio_channels")
                .and_then(|c| c.as_u64())
                .and_then(|c| u8::try_from(c).ok());
            out.sample_rate = p
                .get("audio_sampling_frequency")
                .and_then(|f| f.as_u64())
                .and_then(|f| u32::try_from(f).ok());
        }
        TrackType::Subtitles => {}
    }

    Some(out)
}
