//! Contract with the external execution engine.

use std::path::PathBuf;

/// Outcome of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
    pub error_message: Option<String>,
}

impl JobResult {
    pub fn success(output_path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            output_path: Some(output_path.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_steps(mut self, completed: &[&str], skipped: &[&str]) -> Self {
        self.steps_completed = completed.iter().map(|s| s.to_string()).collect();
        self.steps_skipped = skipped.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Performs the actual merge. Opaque and possibly slow.
///
/// `run_job` is called from a worker thread while the orchestrator keeps
/// draining the log channel.
pub trait ExecutionEngine: Send + Sync {
    /// Checked once per batch, before any job.
    fn is_available(&self) -> bool;

    /// Run one job.
    ///
    /// `source_paths[0]` is Source 1. An empty `layout_json` means "use the
    /// engine's default layout".
    fn run_job(
        &self,
        job_id: &str,
        job_name: &str,
        source_paths: &[PathBuf],
        layout_json: &str,
    ) -> JobResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_result_success() {
        let result =
            JobResult::success("/output/file.mkv").with_steps(&["Analyze", "Mux"], &["Extract"]);

        assert!(result.success);
        assert_eq!(result.output_path, Some(PathBuf::from("/output/file.mkv")));
        assert!(result.error_message.is_none());
        assert_eq!(result.steps_completed.len(), 2);
        assert_eq!(result.steps_skipped, vec!["Extract"]);
    }

    #[test]
    fn job_result_failure() {
        let result = JobResult::failure("Something went wrong");

        assert!(!result.success);
        assert!(result.output_path.is_none());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Something went wrong")
        );
    }
}
