//! Error types for batch runs.
//!
//! Only [`BatchError::EngineUnavailable`] stops a batch; everything else is
//! recovered per job and shows up in the log and the summary counts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    /// The job has no "Source 1"; it is skipped without calling the engine.
    #[error("Job '{job_name}' has no Source 1")]
    MissingReferenceSource { job_name: String },

    /// The layout names a source the engine would not receive (after a gap
    /// or past the source limit).
    #[error("Job '{job_name}' layout uses {key}, but only {available} source(s) can be passed")]
    UnusableSource {
        job_name: String,
        key: String,
        available: usize,
    },

    #[error("Execution engine is not available")]
    EngineUnavailable,

    /// The engine ran and reported failure.
    #[error("Job '{job_name}' failed: {message}")]
    EngineJobFailure { job_name: String, message: String },

    #[error("Failed to create work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove work directory {path}: {source}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize layout for '{job_name}': {source}")]
    Serialize {
        job_name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BatchError {
    pub fn missing_reference(job_name: impl Into<String>) -> Self {
        Self::MissingReferenceSource {
            job_name: job_name.into(),
        }
    }

    pub fn job_failure(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EngineJobFailure {
            job_name: job_name.into(),
            message: message.into(),
        }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
