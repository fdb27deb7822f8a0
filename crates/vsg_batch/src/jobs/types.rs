//! Job types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::models::SourceIndex;

/// Status of a job in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JobStatus {
    /// No accepted layout yet.
    #[default]
    NeedsConfiguration,
    /// Layout accepted, ready to run.
    Configured,
}

impl JobStatus {
    /// Display string for UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsConfiguration => "Needs Configuration",
            Self::Configured => "Configured",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static JOB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique job id: `job_<unix millis>_<counter>`.
pub fn generate_job_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let counter = JOB_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("job_{}_{:04}", millis, counter)
}

/// A single merge job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    /// Display name (reference file stem).
    pub name: String,
    /// Source files by position; "Source 1" is the reference.
    pub sources: BTreeMap<SourceIndex, PathBuf>,
    pub status: JobStatus,
    #[serde(default)]
    pub layout: Layout,
}

impl Job {
    /// New unconfigured job; paths become "Source 1", "Source 2", ... in order.
    pub fn new<P: Into<PathBuf>>(
        name: impl Into<String>,
        paths: impl IntoIterator<Item = P>,
    ) -> Self {
        let sources = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| (SourceIndex::new(i), p.into()))
            .collect();
        Self::with_sources(name, sources)
    }

    /// New unconfigured job from explicit source positions (gaps allowed).
    pub fn with_sources(name: impl Into<String>, sources: BTreeMap<SourceIndex, PathBuf>) -> Self {
        Self {
            id: generate_job_id(),
            name: name.into(),
            sources,
            status: JobStatus::NeedsConfiguration,
            layout: Layout::default(),
        }
    }

    /// Ready to run.
    pub fn is_ready(&self) -> bool {
        self.status == JobStatus::Configured
    }

    pub fn source(&self, index: SourceIndex) -> Option<&Path> {
        self.sources.get(&index).map(PathBuf::as_path)
    }

    /// The "Source 1" path, if set.
    pub fn reference_source(&self) -> Option<&Path> {
        self.source(SourceIndex::reference())
    }

    /// `ref.mkv (+2 sources)` for queue display.
    pub fn sources_summary(&self) -> String {
        let Some(reference) = self.reference_source() else {
            return String::new();
        };
        let file_name = reference
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| reference.to_string_lossy().to_string());

        match self.sources.len().saturating_sub(1) {
            0 => file_name,
            1 => format!("{} (+1 source)", file_name),
            n => format!("{} (+{} sources)", file_name, n),
        }
    }
}
