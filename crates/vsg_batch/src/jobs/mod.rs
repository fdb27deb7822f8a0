//! Jobs and the job queue.
//!
//! This module provides:
//! - `Job`: sources, status, and layout of one merge
//! - `JobQueue`: ordered jobs, sorted by name on insertion
//! - `LayoutClipboard`: copy one job's layout onto others
//! - `discovery`: turn source paths (files or folders) into jobs

mod clipboard;
mod discovery;
mod queue;
mod types;

pub use clipboard::LayoutClipboard;
pub use discovery::{discover_jobs, jobs_from_paths, DiscoveredJob, DiscoveryError};
pub use queue::JobQueue;
pub use types::{generate_job_id, Job, JobStatus};
