//! Layout clipboard: reuse one job's layout on others.

use super::types::{Job, JobStatus};
use crate::layout::Layout;

#[derive(Debug, Clone)]
struct ClipboardEntry {
    layout: Layout,
    source_job_id: String,
}

/// Holds at most one copied layout. Lives for one session, never persisted.
#[derive(Debug, Clone, Default)]
pub struct LayoutClipboard {
    entry: Option<ClipboardEntry>,
}

impl LayoutClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a configured job's layout. Returns false (clipboard untouched) if
    /// the job has nothing to copy.
    pub fn copy(&mut self, job: &Job) -> bool {
        if let Some(reason) = copy_refusal(job) {
            tracing::warn!("Nothing to copy from '{}': {}", job.name, reason);
            return false;
        }

        self.entry = Some(ClipboardEntry {
            layout: job.layout.clone(),
            source_job_id: job.id.clone(),
        });
        tracing::debug!("Copied layout from '{}'", job.name);
        true
    }

    /// Overwrite each target's layout with a copy of the clipboard and mark
    /// it configured. Returns the number of jobs updated.
    pub fn paste<'a>(&self, targets: impl IntoIterator<Item = &'a mut Job>) -> usize {
        let Some(ref entry) = self.entry else {
            return 0;
        };

        let mut count = 0;
        for job in targets {
            job.layout = entry.layout.clone();
            job.status = JobStatus::Configured;
            count += 1;
        }
        tracing::debug!(
            "Pasted layout from {} into {} jobs",
            entry.source_job_id,
            count
        );
        count
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Id of the job the layout was copied from.
    pub fn source_job_id(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.source_job_id.as_str())
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.entry.as_ref().map(|e| &e.layout)
    }
}

fn copy_refusal(job: &Job) -> Option<&'static str> {
    if job.status != JobStatus::Configured {
        Some("job is not configured")
    } else if job.layout.is_empty() {
        Some("layout has no tracks")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FinalTrack;
    use crate::models::{SourceIndex, SourceTrack, TrackType};

    fn configured_job(name: &str) -> Job {
        let mut job = Job::new(name, ["/a.mkv", "/b.mkv"]);
        job.layout.final_tracks.push(FinalTrack::new(
            SourceTrack::new(0, TrackType::Video, "V_MPEG4/ISO/AVC"),
            SourceIndex::reference().into(),
        ));
        job.layout.attachment_sources.insert(SourceIndex::new(1));
        job.status = JobStatus::Configured;
        job
    }

    #[test]
    fn paste_on_empty_clipboard_is_noop() {
        let clipboard = LayoutClipboard::new();
        let mut target = Job::new("t", ["/a.mkv"]);
        let before = target.clone();

        assert_eq!(clipboard.paste([&mut target]), 0);
        assert_eq!(target, before);
    }

    #[test]
    fn copy_rejects_unconfigured_job() {
        let mut clipboard = LayoutClipboard::new();
        assert!(!clipboard.copy(&Job::new("raw", ["/a.mkv"])));
        assert!(clipboard.is_empty());
    }

    #[test]
    fn copy_refusal_names_the_reason() {
        let raw = Job::new("raw", ["/a.mkv"]);
        assert_eq!(copy_refusal(&raw), Some("job is not configured"));

        let mut hollow = configured_job("hollow");
        hollow.layout.final_tracks.clear();
        assert_eq!(copy_refusal(&hollow), Some("layout has no tracks"));
        assert!(!LayoutClipboard::new().copy(&hollow));

        assert_eq!(copy_refusal(&configured_job("ok")), None);
    }

    #[test]
    fn copy_then_paste_gives_independent_copies() {
        let source = configured_job("src");
        let mut clipboard = LayoutClipboard::new();
        assert!(clipboard.copy(&source));
        assert_eq!(clipboard.source_job_id(), Some(source.id.as_str()));

        let mut a = Job::new("a", ["/a.mkv", "/b.mkv"]);
        let mut b = Job::new("b", ["/a.mkv", "/b.mkv"]);
        assert_eq!(clipboard.paste([&mut a, &mut b]), 2);

        assert_eq!(a.status, JobStatus::Configured);
        assert_eq!(b.status, JobStatus::Configured);
        assert_eq!(a.layout, source.layout);

        a.layout.final_tracks[0].config.custom_name = Some("Edited".to_string());
        assert_eq!(b.layout, source.layout);
        assert_eq!(clipboard.layout(), Some(&source.layout));
    }

    #[test]
    fn clear_empties_clipboard() {
        let mut clipboard = LayoutClipboard::new();
        clipboard.copy(&configured_job("src"));
        clipboard.clear();
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.source_job_id(), None);
    }
}
