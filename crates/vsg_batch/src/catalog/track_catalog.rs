//! Per-session cache of scanned source tracks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::jobs::Job;
use crate::models::{SourceIndex, SourceTrack, TrackType};

use super::inspector::{CatalogError, MediaInspector};

/// Result of scanning one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub tracks: Vec<SourceTrack>,
    /// False when `tracks` are fallback placeholders.
    pub ok: bool,
    pub error: Option<String>,
}

impl ScanOutcome {
    fn scanned(tracks: Vec<SourceTrack>) -> Self {
        Self {
            tracks,
            ok: true,
            error: None,
        }
    }

    fn fallback(path: &Path, error: &CatalogError) -> Self {
        let original_path = path.to_string_lossy().to_string();
        let placeholder = |id, track_type| {
            let mut track = SourceTrack::new(id, track_type, "").with_path(original_path.clone());
            track.scan_unavailable = true;
            track
        };

        Self {
            tracks: vec![
                placeholder(0, TrackType::Video),
                placeholder(1, TrackType::Audio),
            ],
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

/// Wraps a [`MediaInspector`] for one configuration session.
///
/// Every path is scanned at most once; failures degrade to a fixed
/// video + audio placeholder pair so there is always something to select.
pub struct TrackCatalog {
    inspector: Box<dyn MediaInspector>,
    cache: HashMap<PathBuf, ScanOutcome>,
}

impl TrackCatalog {
    pub fn new(inspector: Box<dyn MediaInspector>) -> Self {
        Self {
            inspector,
            cache: HashMap::new(),
        }
    }

    /// Tracks for `path`, from cache when already scanned.
    pub fn scan(&mut self, path: impl AsRef<Path>) -> ScanOutcome {
        let path = path.as_ref();
        if let Some(hit) = self.cache.get(path) {
            return hit.clone();
        }

        let result = if self.inspector.is_available() {
            self.inspector.inspect(path)
        } else {
            Err(CatalogError::ScanUnavailable(
                "inspection service not available".to_string(),
            ))
        };

        let outcome = match result {
            Ok(tracks) => ScanOutcome::scanned(tracks),
            Err(e) => {
                tracing::warn!("Track scan failed for {}: {}", path.display(), e);
                ScanOutcome::fallback(path, &e)
            }
        };

        self.cache.insert(path.to_path_buf(), outcome.clone());
        outcome
    }

    /// Scan every source of a job, in source order.
    pub fn scan_job(&mut self, job: &Job) -> Vec<(SourceIndex, ScanOutcome)> {
        job.sources
            .iter()
            .map(|(idx, path)| (*idx, self.scan(path)))
            .collect()
    }

    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.cache.contains_key(path.as_ref())
    }

    /// End the configuration session: forget every scan.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
