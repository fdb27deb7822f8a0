//! Ordered job queue.

use super::clipboard::LayoutClipboard;
use super::types::{Job, JobStatus};
use crate::layout::{Layout, LayoutError};
use crate::models::MoveDirection;

/// In-memory job queue, kept sorted by name on insertion.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Vec<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Append jobs, then re-sort the whole queue by name (case-insensitive).
    ///
    /// The sort is stable, so equal names keep their relative order and
    /// earlier manual reordering between them survives.
    pub fn add(&mut self, jobs: impl IntoIterator<Item = Job>) {
        let before = self.jobs.len();
        self.jobs.extend(jobs);
        self.jobs.sort_by_cached_key(|j| j.name.to_lowercase());
        tracing::debug!(
            "Added {} jobs, queue now {}",
            self.jobs.len() - before,
            self.jobs.len()
        );
    }

    /// Remove jobs by index. Out-of-range and repeated indices are ignored.
    /// Returns the number removed.
    pub fn remove(&mut self, indices: &[usize]) -> usize {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed = 0;
        for idx in sorted {
            if idx < self.jobs.len() {
                self.jobs.remove(idx);
                removed += 1;
            }
        }
        removed
    }

    /// Move the selected rows one step as a block.
    ///
    /// Refused (returns false, queue untouched) when the selection is empty,
    /// contains an invalid index, or already touches the edge it would move
    /// past.
    pub fn move_rows(&mut self, indices: &[usize], direction: MoveDirection) -> bool {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
            return false;
        };
        if last >= self.jobs.len() {
            return false;
        }

        match direction {
            MoveDirection::Up => {
                if first == 0 {
                    return false;
                }
                for idx in sorted {
                    self.jobs.swap(idx, idx - 1);
                }
            }
            MoveDirection::Down => {
                if last + 1 >= self.jobs.len() {
                    return false;
                }
                for idx in sorted.into_iter().rev() {
                    self.jobs.swap(idx, idx + 1);
                }
            }
        }
        true
    }

    /// Jobs ready to run, in queue order.
    pub fn final_jobs(&self) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.is_ready()).collect()
    }

    /// Owned copies of [`final_jobs`](Self::final_jobs) for a batch run.
    pub fn final_jobs_cloned(&self) -> Vec<Job> {
        self.jobs.iter().filter(|j| j.is_ready()).cloned().collect()
    }

    /// Store an accepted layout on a job and mark it configured.
    pub fn set_layout(&mut self, index: usize, layout: Layout) -> Result<(), LayoutError> {
        let len = self.jobs.len();
        let job = self
            .jobs
            .get_mut(index)
            .ok_or(LayoutError::IndexOutOfRange { index, len })?;
        if layout.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }
        job.layout = layout;
        job.status = JobStatus::Configured;
        Ok(())
    }

    /// Put back a job (matched by id) returned from a layout editor.
    ///
    /// A configured job is never downgraded; returns false if the id is
    /// unknown or the update would do that.
    pub fn replace_job(&mut self, job: Job) -> bool {
        let Some(slot) = self.jobs.iter_mut().find(|j| j.id == job.id) else {
            return false;
        };
        if slot.status == JobStatus::Configured && job.status != JobStatus::Configured {
            tracing::warn!("Refusing to unconfigure '{}'", slot.name);
            return false;
        }
        *slot = job;
        true
    }

    pub fn copy_layout(&self, index: usize, clipboard: &mut LayoutClipboard) -> bool {
        self.jobs.get(index).is_some_and(|job| clipboard.copy(job))
    }

    /// Paste into the jobs at `indices`; invalid indices are skipped.
    pub fn paste_layout(&mut self, indices: &[usize], clipboard: &LayoutClipboard) -> usize {
        let mut wanted = indices.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let targets = self
            .jobs
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| wanted.binary_search(i).is_ok())
            .map(|(_, job)| job);
        clipboard.paste(targets)
    }

    /// Drop every job.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FinalTrack;
    use crate::models::{SourceIndex, SourceTrack, TrackType};

    fn job(name: &str) -> Job {
        Job::new(
            name,
            [format!("/a/{}.mkv", name), format!("/b/{}.mkv", name)],
        )
    }

    fn names(queue: &JobQueue) -> Vec<&str> {
        queue.jobs().iter().map(|j| j.name.as_str()).collect()
    }

    fn one_track_layout() -> Layout {
        let mut layout = Layout::new();
        layout.final_tracks.push(FinalTrack::new(
            SourceTrack::new(0, TrackType::Video, "V_MPEG4/ISO/AVC"),
            SourceIndex::reference().into(),
        ));
        layout
    }

    #[test]
    fn add_sorts_by_name() {
        let mut queue = JobQueue::new();
        queue.add([job("b"), job("a")]);
        assert_eq!(names(&queue), vec!["a", "b"]);
    }

    #[test]
    fn add_is_stable_and_global() {
        let mut queue = JobQueue::new();
        queue.add([job("a1"), job("b")]);
        queue.add([job("a2")]);
        assert_eq!(names(&queue), vec!["a1", "a2", "b"]);
    }

    #[test]
    fn add_ignores_case_and_keeps_ties_in_order() {
        let mut queue = JobQueue::new();
        let first = job("Ep");
        let second = job("ep");
        let first_id = first.id.clone();
        queue.add([job("Zed"), first, second, job("alpha")]);

        assert_eq!(names(&queue), vec!["alpha", "Ep", "ep", "Zed"]);
        assert_eq!(queue.get(1).unwrap().id, first_id);
    }

    #[test]
    fn remove_ignores_out_of_range() {
        let mut queue = JobQueue::new();
        queue.add([job("a"), job("b"), job("c"), job("d")]);

        assert_eq!(queue.remove(&[0, 2, 9, 2]), 2);
        assert_eq!(names(&queue), vec!["b", "d"]);
    }

    #[test]
    fn move_rows_block_up_and_down() {
        let mut queue = JobQueue::new();
        queue.add([job("a"), job("b"), job("c"), job("d")]);

        assert!(queue.move_rows(&[1, 2], MoveDirection::Up));
        assert_eq!(names(&queue), vec!["b", "c", "a", "d"]);

        assert!(queue.move_rows(&[0, 1], MoveDirection::Down));
        assert_eq!(names(&queue), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn move_rows_is_all_or_nothing_at_edges() {
        let mut queue = JobQueue::new();
        queue.add([job("a"), job("b"), job("c")]);

        assert!(!queue.move_rows(&[0, 2], MoveDirection::Up));
        assert!(!queue.move_rows(&[1, 2], MoveDirection::Down));
        assert!(!queue.move_rows(&[1, 7], MoveDirection::Up));
        assert!(!queue.move_rows(&[], MoveDirection::Up));
        assert_eq!(names(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn final_jobs_only_configured_in_order() {
        let mut queue = JobQueue::new();
        queue.add([job("a"), job("b"), job("c")]);
        queue.set_layout(2, one_track_layout()).unwrap();
        queue.set_layout(0, one_track_layout()).unwrap();

        let ready: Vec<&str> = queue.final_jobs().iter().map(|j| j.name.as_str()).collect();
        assert_eq!(ready, vec!["a", "c"]);
        assert!(queue
            .final_jobs()
            .iter()
            .all(|j| j.status == JobStatus::Configured));
        assert_eq!(queue.final_jobs_cloned().len(), 2);
    }

    #[test]
    fn set_layout_rejects_empty_and_bad_index() {
        let mut queue = JobQueue::new();
        queue.add([job("a")]);

        assert_eq!(
            queue.set_layout(0, Layout::new()),
            Err(LayoutError::EmptyLayout)
        );
        assert_eq!(queue.get(0).unwrap().status, JobStatus::NeedsConfiguration);
        assert!(matches!(
            queue.set_layout(4, one_track_layout()),
            Err(LayoutError::IndexOutOfRange { index: 4, len: 1 })
        ));
    }

    #[test]
    fn replace_job_never_downgrades() {
        let mut queue = JobQueue::new();
        queue.add([job("a")]);
        queue.set_layout(0, one_track_layout()).unwrap();

        let mut stale = queue.get(0).unwrap().clone();
        stale.status = JobStatus::NeedsConfiguration;
        assert!(!queue.replace_job(stale));
        assert_eq!(queue.get(0).unwrap().status, JobStatus::Configured);

        assert!(!queue.replace_job(job("unknown")));
    }

    #[test]
    fn copy_paste_through_clipboard() {
        let mut queue = JobQueue::new();
        let mut clipboard = LayoutClipboard::new();
        queue.add([job("a"), job("b"), job("c")]);

        assert!(!queue.copy_layout(1, &mut clipboard));
        queue.set_layout(0, one_track_layout()).unwrap();
        assert!(queue.copy_layout(0, &mut clipboard));

        assert_eq!(queue.paste_layout(&[1, 2, 2, 8], &clipboard), 2);
        assert_eq!(queue.final_jobs().len(), 3);
    }

    #[test]
    fn lookup_and_clear() {
        let mut queue = JobQueue::new();
        let a = job("a");
        let id = a.id.clone();
        queue.add([a]);

        assert_eq!(queue.get_by_id(&id).unwrap().name, "a");
        queue.get_mut(0).unwrap().name = "renamed".to_string();
        assert_eq!(queue.get(0).unwrap().name, "renamed");

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
