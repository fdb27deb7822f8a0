//! One batch-configuration session.
//!
//! Owns the job queue, the layout clipboard, and the settings snapshot.
//! Nothing here is global; create one per window or test.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::jobs::{discover_jobs, jobs_from_paths, DiscoveryError, Job, JobQueue, LayoutClipboard};
use crate::layout::{LayoutEngine, LayoutError};
use crate::orchestrator::{
    BatchObserver, BatchOrchestrator, BatchSummary, ExecutionEngine, LogChannel,
};

pub struct Session {
    queue: JobQueue,
    clipboard: LayoutClipboard,
    settings: Settings,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            queue: JobQueue::new(),
            clipboard: LayoutClipboard::new(),
            settings,
        }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut JobQueue {
        &mut self.queue
    }

    pub fn clipboard(&self) -> &LayoutClipboard {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut LayoutClipboard {
        &mut self.clipboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Discover jobs for `paths` and queue them. Falls back to a single job
    /// from the paths when nothing matched. Returns the number added.
    pub fn add_from_paths(&mut self, paths: &[PathBuf]) -> Result<usize, DiscoveryError> {
        let mut found = discover_jobs(paths)?;
        if found.is_empty() {
            found.extend(jobs_from_paths(paths));
        }

        let count = found.len();
        self.queue.add(found.into_iter().map(|d| d.into_job()));
        Ok(count)
    }

    pub fn add_jobs(&mut self, jobs: impl IntoIterator<Item = Job>) {
        self.queue.add(jobs);
    }

    /// Open a layout editor for the job at `index`, preloaded with its
    /// current layout.
    pub fn layout_editor(&self, index: usize) -> Option<LayoutEngine> {
        self.queue.get(index).cloned().map(LayoutEngine::edit)
    }

    /// Accept an editor's layout back into the queue.
    ///
    /// `Ok(false)` when the job has since left the queue.
    pub fn apply_layout(&mut self, editor: &LayoutEngine) -> Result<bool, LayoutError> {
        let job = editor.finalize()?;
        Ok(self.queue.replace_job(job))
    }

    pub fn copy_layout(&mut self, index: usize) -> bool {
        self.queue.copy_layout(index, &mut self.clipboard)
    }

    pub fn paste_layout(&mut self, indices: &[usize]) -> usize {
        self.queue.paste_layout(indices, &self.clipboard)
    }

    /// Orchestrator configured from this session's settings.
    pub fn orchestrator(
        &self,
        engine: Arc<dyn ExecutionEngine>,
        channel: Arc<dyn LogChannel>,
    ) -> BatchOrchestrator {
        BatchOrchestrator::from_settings(engine, channel, &self.settings)
    }

    /// Run every configured job in queue order.
    pub fn run_batch(
        &self,
        orchestrator: &BatchOrchestrator,
        observer: Arc<dyn BatchObserver>,
    ) -> BatchSummary {
        orchestrator.run(&self.queue.final_jobs_cloned(), observer)
    }

    /// Empty the queue and clipboard.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.clipboard.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobStatus;
    use crate::models::{SourceIndex, SourceRef, SourceTrack, TrackType};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn editor_round_trip_configures_job() {
        let mut session = Session::default();
        session.add_jobs([Job::new("ep1", ["/m/ep1.mkv", "/j/ep1.mkv"])]);

        let mut editor = session.layout_editor(0).unwrap();
        let video = SourceTrack::new(0, TrackType::Video, "V_MPEG4/ISO/AVC");
        editor
            .add_track(&video, SourceRef::Index(SourceIndex::reference()))
            .unwrap();
        assert!(session.apply_layout(&editor).unwrap());

        assert_eq!(
            session.queue().get(0).unwrap().status,
            JobStatus::Configured
        );
        assert_eq!(session.queue().final_jobs().len(), 1);
    }

    #[test]
    fn empty_editor_leaves_job_unconfigured() {
        let mut session = Session::default();
        session.add_jobs([Job::new("ep1", ["/m/ep1.mkv"])]);

        let editor = session.layout_editor(0).unwrap();
        assert_eq!(session.apply_layout(&editor), Err(LayoutError::EmptyLayout));
        assert!(session.queue().final_jobs().is_empty());
    }

    #[test]
    fn apply_after_removal_is_noop() {
        let mut session = Session::default();
        session.add_jobs([Job::new("ep1", ["/m/ep1.mkv"])]);

        let mut editor = session.layout_editor(0).unwrap();
        let audio = SourceTrack::new(1, TrackType::Audio, "A_AAC");
        editor
            .add_track(&audio, SourceIndex::reference().into())
            .unwrap();
        session.queue_mut().remove(&[0]);

        assert_eq!(session.apply_layout(&editor), Ok(false));
    }

    #[test]
    fn copy_paste_across_queue() {
        let mut session = Session::default();
        session.add_jobs([
            Job::new("a", ["/m/a.mkv"]),
            Job::new("b", ["/m/b.mkv"]),
            Job::new("c", ["/m/c.mkv"]),
        ]);

        let mut editor = session.layout_editor(0).unwrap();
        let audio = SourceTrack::new(1, TrackType::Audio, "A_AAC");
        editor
            .add_track(&audio, SourceIndex::reference().into())
            .unwrap();
        assert!(session.apply_layout(&editor).unwrap());

        assert!(session.copy_layout(0));
        assert_eq!(session.paste_layout(&[1, 2]), 2);
        assert_eq!(session.queue().final_jobs().len(), 3);

        session.reset();
        assert!(session.queue().is_empty());
        assert!(session.clipboard().is_empty());
    }

    #[test]
    fn add_from_paths_falls_back_to_single_job() {
        let dir = tempdir().unwrap();
        let ref_dir = dir.path().join("ref");
        let sec_dir = dir.path().join("sec");
        fs::create_dir_all(&ref_dir).unwrap();
        fs::create_dir_all(&sec_dir).unwrap();
        fs::write(ref_dir.join("a.mkv"), b"x").unwrap();
        fs::write(sec_dir.join("a.mkv"), b"x").unwrap();
        fs::write(ref_dir.join("b.mkv"), b"x").unwrap();

        let mut session = Session::default();
        assert_eq!(
            session
                .add_from_paths(&[ref_dir.clone(), sec_dir.clone()])
                .unwrap(),
            1
        );
        assert_eq!(session.queue().get(0).unwrap().name, "a");

        let empty_sec = dir.path().join("empty");
        fs::create_dir_all(&empty_sec).unwrap();
        let mut session = Session::default();
        assert_eq!(session.add_from_paths(&[ref_dir, empty_sec]).unwrap(), 1);
        assert_eq!(session.queue().get(0).unwrap().name, "ref");
    }
}
