//! Sequential batch runner.
//!
//! For each ready job, in order:
//! 1. collect source paths (Source 1, 2, ... up to the first gap)
//! 2. create `<temp_root>/orch_<run id>`, run id = `<batch stamp>_<index>`
//! 3. serialize the layout (empty layout = empty payload)
//! 4. call the engine on a worker thread, draining the log channel meanwhile
//! 5. drain once more, record the result
//! 6. remove the work directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;

use crate::config::Settings;
use crate::jobs::Job;
use crate::logging::{BatchLogger, LogCallback, LogConfig};
use crate::models::SourceIndex;

use super::channel::LogChannel;
use super::engine::{ExecutionEngine, JobResult};
use super::errors::{BatchError, BatchResult};

/// Status reported once the batch is over.
pub const IDLE_STATUS: &str = "Ready";

static BATCH_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique per batch: millisecond time plus an in-process sequence number.
fn batch_stamp() -> String {
    let seq = BATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S_%3f"), seq)
}

/// Receives everything a batch produces, on the calling thread.
pub trait BatchObserver: Send + Sync {
    /// One formatted log line.
    fn on_log(&self, line: &str);

    /// Engine progress, forwarded as reported.
    fn on_progress(&self, _percent: i32, _status: &str) {}
}

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    /// Stopped early through a [`CancelHandle`].
    pub cancelled: bool,
    /// Nothing ran because the engine was unavailable.
    pub aborted: bool,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Completed: {}, Failed: {}", self.completed, self.failed)
    }
}

/// Stops a running batch before its next job.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// The job in progress still finishes.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Runs configured jobs through an [`ExecutionEngine`].
pub struct BatchOrchestrator {
    engine: Arc<dyn ExecutionEngine>,
    channel: Arc<dyn LogChannel>,
    temp_root: PathBuf,
    logs_folder: Option<PathBuf>,
    log_config: LogConfig,
    poll_interval: Duration,
    max_sources: usize,
    cancelled: Arc<AtomicBool>,
}

impl BatchOrchestrator {
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        channel: Arc<dyn LogChannel>,
        temp_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            channel,
            temp_root: temp_root.into(),
            logs_folder: None,
            log_config: LogConfig::default(),
            poll_interval: Duration::from_millis(50),
            max_sources: 4,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Temp root, logs folder, poll interval, source limit, and log format
    /// from settings.
    pub fn from_settings(
        engine: Arc<dyn ExecutionEngine>,
        channel: Arc<dyn LogChannel>,
        settings: &Settings,
    ) -> Self {
        let orchestrator = Self::new(engine, channel, &settings.paths.temp_root)
            .with_log_config(LogConfig::from(&settings.logging))
            .with_poll_interval(Duration::from_millis(settings.batch.poll_interval_ms))
            .with_max_sources(settings.batch.max_sources);

        if settings.paths.logs_folder.trim().is_empty() {
            orchestrator
        } else {
            orchestrator.with_logs_folder(&settings.paths.logs_folder)
        }
    }

    /// Also write each batch log to a file in `dir`.
    pub fn with_logs_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_folder = Some(dir.into());
        self
    }

    pub fn with_log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources.max(1);
        self
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Handle for cancelling between jobs. The flag is reset when a batch
    /// starts.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Run every ready job in `jobs`, in order.
    ///
    /// Jobs that are not configured are ignored.
    pub fn run(&self, jobs: &[Job], observer: Arc<dyn BatchObserver>) -> BatchSummary {
        self.cancelled.store(false, Ordering::SeqCst);
        let stamp = batch_stamp();
        let logger = self.create_logger(Arc::clone(&observer), &stamp);
        let mut drain = DrainState::default();
        let mut summary = BatchSummary::default();

        let ready: Vec<&Job> = jobs.iter().filter(|j| j.is_ready()).collect();

        if !self.engine.is_available() {
            logger.error(&BatchError::EngineUnavailable.to_string());
            tracing::warn!("Batch aborted: engine unavailable");
            summary.aborted = true;
            self.finish(&logger, observer.as_ref(), &summary);
            return summary;
        }

        logger.phase(&format!("Batch: {} job(s)", ready.len()));

        for (batch_index, job) in ready.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                logger.warn(&format!(
                    "Batch cancelled, {} job(s) not run",
                    ready.len() - batch_index
                ));
                summary.cancelled = true;
                break;
            }

            tracing::info!(
                "Processing job {}/{}: {}",
                batch_index + 1,
                ready.len(),
                job.name
            );
            logger.phase(&format!(
                "Job {}/{}: {}",
                batch_index + 1,
                ready.len(),
                job.name
            ));
            logger.clear_tail();
            logger.reset_progress();

            let run_id = format!("{}_{}", stamp, batch_index);
            match self.process_job(job, &run_id, &logger, observer.as_ref(), &mut drain) {
                Ok(result) => {
                    summary.completed += 1;
                    let output = result
                        .output_path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    logger.success(&format!("Output: {}", output));
                    if !result.steps_completed.is_empty() {
                        logger.info(&format!(
                            "Steps completed: {}",
                            result.steps_completed.join(", ")
                        ));
                    }
                    if !result.steps_skipped.is_empty() {
                        logger.info(&format!(
                            "Steps skipped: {}",
                            result.steps_skipped.join(", ")
                        ));
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    logger.error(&e.to_string());
                    logger.show_tail(&job.name);
                }
            }
        }

        self.finish(&logger, observer.as_ref(), &summary);
        summary
    }

    fn finish(&self, logger: &BatchLogger, observer: &dyn BatchObserver, summary: &BatchSummary) {
        logger.info(&summary.to_string());
        tracing::info!("Batch finished: {}", summary);
        logger.close();
        observer.on_progress(0, IDLE_STATUS);
    }

    fn create_logger(&self, observer: Arc<dyn BatchObserver>, stamp: &str) -> BatchLogger {
        let callback: LogCallback = Box::new(move |line| observer.on_log(line));
        let logger = BatchLogger::without_file(self.log_config.clone(), Some(callback));

        if let Some(ref dir) = self.logs_folder {
            let name = format!("batch_{}", stamp);
            if let Err(e) = logger.open_file(dir, &name) {
                tracing::warn!("Batch log file unavailable in {}: {}", dir.display(), e);
            }
        }
        logger
    }

    fn process_job(
        &self,
        job: &Job,
        run_id: &str,
        logger: &BatchLogger,
        observer: &dyn BatchObserver,
        drain: &mut DrainState,
    ) -> BatchResult<JobResult> {
        let source_paths = self.collect_sources(job)?;
        logger.info(&format!("Sources: {}", source_paths.len()));

        let work_dir = self.temp_root.join(format!("orch_{}", run_id));
        fs::create_dir_all(&work_dir).map_err(|source| BatchError::WorkDir {
            path: work_dir.clone(),
            source,
        })?;

        let outcome = self.execute(job, run_id, &source_paths, logger, observer, drain);
        self.cleanup(&work_dir, logger);
        outcome
    }

    fn execute(
        &self,
        job: &Job,
        run_id: &str,
        source_paths: &[PathBuf],
        logger: &BatchLogger,
        observer: &dyn BatchObserver,
        drain: &mut DrainState,
    ) -> BatchResult<JobResult> {
        let payload = if job.layout.is_empty() {
            logger.info("Layout: engine defaults");
            String::new()
        } else {
            logger.info(&format!("Tracks: {} in layout", job.layout.track_count()));
            job.layout
                .to_wire_json()
                .map_err(|source| BatchError::Serialize {
                    job_name: job.name.clone(),
                    source,
                })?
        };

        self.drain(logger, observer, drain);
        let result = self.call_engine(
            run_id,
            &job.name,
            source_paths,
            &payload,
            logger,
            observer,
            drain,
        );
        self.drain(logger, observer, drain);

        if result.success {
            Ok(result)
        } else {
            let message = result
                .error_message
                .unwrap_or_else(|| "Engine reported failure without a message".to_string());
            Err(BatchError::job_failure(&job.name, message))
        }
    }

    /// Run the engine on a scoped worker, draining every poll interval until
    /// it returns.
    #[allow(clippy::too_many_arguments)]
    fn call_engine(
        &self,
        run_id: &str,
        job_name: &str,
        source_paths: &[PathBuf],
        payload: &str,
        logger: &BatchLogger,
        observer: &dyn BatchObserver,
        drain: &mut DrainState,
    ) -> JobResult {
        let engine = self.engine.as_ref();

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel();
            let worker = scope.spawn(move || {
                let result = engine.run_job(run_id, job_name, source_paths, payload);
                let _ = tx.send(result);
            });

            let received = loop {
                match rx.recv_timeout(self.poll_interval) {
                    Ok(result) => break Some(result),
                    Err(RecvTimeoutError::Timeout) => self.drain(logger, observer, drain),
                    Err(RecvTimeoutError::Disconnected) => break None,
                }
            };

            match worker.join() {
                Ok(()) => {
                    received.unwrap_or_else(|| JobResult::failure("Engine returned no result"))
                }
                Err(_) => JobResult::failure("Engine panicked while running the job"),
            }
        })
    }

    /// Source 1, 2, ... up to `max_sources`, stopping at the first gap.
    fn collect_sources(&self, job: &Job) -> BatchResult<Vec<PathBuf>> {
        let paths: Vec<PathBuf> = (0..self.max_sources)
            .map_while(|i| job.source(SourceIndex::new(i)).map(Path::to_path_buf))
            .collect();

        if paths.is_empty() {
            return Err(BatchError::missing_reference(&job.name));
        }
        if paths.len() < job.sources.len() {
            tracing::debug!(
                "'{}': using {} of {} sources",
                job.name,
                paths.len(),
                job.sources.len()
            );
        }

        let layout = &job.layout;
        let referenced = layout
            .final_tracks
            .iter()
            .flat_map(|t| [t.source.as_index(), t.config.sync_to_source])
            .flatten()
            .chain(layout.attachment_sources.iter().copied());
        if let Some(unusable) = referenced.filter(|s| s.index() >= paths.len()).min() {
            return Err(BatchError::UnusableSource {
                job_name: job.name.clone(),
                key: unusable.key(),
                available: paths.len(),
            });
        }
        Ok(paths)
    }

    /// Forward pending messages and any progress change.
    fn drain(&self, logger: &BatchLogger, observer: &dyn BatchObserver, state: &mut DrainState) {
        while let Some(message) = self.channel.poll_log() {
            logger.engine_message(&message);
        }

        let progress = self.channel.progress();
        if state.last_progress.as_ref() != Some(&progress) {
            let (percent, ref status) = progress;
            observer.on_progress(percent, status);
            logger.progress(percent.clamp(0, 100) as u32);
            state.last_progress = Some(progress);
        }
    }

    fn cleanup(&self, work_dir: &Path, logger: &BatchLogger) {
        if !work_dir.exists() {
            return;
        }
        if let Err(source) = fs::remove_dir_all(work_dir) {
            let err = BatchError::CleanupFailed {
                path: work_dir.to_path_buf(),
                source,
            };
            logger.warn(&err.to_string());
        }
    }
}

#[derive(Default)]
struct DrainState {
    last_progress: Option<(i32, String)>,
}
