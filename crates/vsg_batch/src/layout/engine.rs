//! Interactive layout editing for one job.

use std::collections::BTreeSet;
use std::path::Path;

use crate::jobs::{Job, JobStatus};
use crate::models::{MoveDirection, SourceIndex, SourceRef, SourceTrack, TrackType};

use super::types::{FinalTrack, Layout, LayoutError, TrackConfig};

/// Edits the layout of a single job.
///
/// Holds a working copy; the job itself only changes through
/// [`finalize`](Self::finalize).
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    job: Job,
    final_tracks: Vec<FinalTrack>,
    attachment_sources: BTreeSet<SourceIndex>,
    external_tracks: Vec<SourceTrack>,
    next_external_id: u32,
}

impl LayoutEngine {
    /// Start from an empty layout.
    pub fn new(job: Job) -> Self {
        Self {
            job,
            final_tracks: Vec::new(),
            attachment_sources: BTreeSet::new(),
            external_tracks: Vec::new(),
            next_external_id: 0,
        }
    }

    /// Reopen a job with its current layout loaded.
    pub fn edit(job: Job) -> Self {
        let final_tracks = job.layout.final_tracks.clone();
        let attachment_sources = job.layout.attachment_sources.clone();
        let external_tracks: Vec<SourceTrack> = final_tracks
            .iter()
            .filter(|t| t.is_external())
            .map(|t| t.track.clone())
            .collect();
        let next_external_id = external_tracks.iter().map(|t| t.id + 1).max().unwrap_or(0);

        Self {
            job,
            final_tracks,
            attachment_sources,
            external_tracks,
            next_external_id,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn tracks(&self) -> &[FinalTrack] {
        &self.final_tracks
    }

    pub fn attachment_sources(&self) -> &BTreeSet<SourceIndex> {
        &self.attachment_sources
    }

    /// External subtitle files added this session.
    pub fn external_tracks(&self) -> &[SourceTrack] {
        &self.external_tracks
    }

    /// Whether `track` from `source` may not be selected.
    ///
    /// With more than one source, video only comes from the reference.
    /// External files count as non-reference.
    pub fn is_blocked(&self, track: &SourceTrack, source: SourceRef) -> bool {
        track.track_type == TrackType::Video
            && self.job.sources.len() >= 2
            && !source.is_reference()
    }

    /// Append a track to the output list.
    ///
    /// Indexed sources must belong to the job.
    pub fn add_track(
        &mut self,
        track: &SourceTrack,
        source: SourceRef,
    ) -> Result<&FinalTrack, LayoutError> {
        if let Some(index) = source.as_index() {
            if !self.job.sources.contains_key(&index) {
                tracing::warn!(
                    "Rejected track {} from {}: not in '{}'",
                    track.id,
                    source,
                    self.job.name
                );
                return Err(LayoutError::UnknownSource { origin: index });
            }
        }
        if self.is_blocked(track, source) {
            tracing::warn!(
                "Rejected {} track {} from {}",
                track.track_type,
                track.id,
                source
            );
            return Err(LayoutError::BlockedTrack {
                track_type: track.track_type,
                origin: source,
                reference: SourceIndex::reference(),
            });
        }

        self.final_tracks
            .push(FinalTrack::new(track.clone(), source));
        let index = self.final_tracks.len() - 1;
        Ok(&self.final_tracks[index])
    }

    pub fn remove_track(&mut self, index: usize) -> Result<FinalTrack, LayoutError> {
        self.check_index(index)?;
        Ok(self.final_tracks.remove(index))
    }

    /// Move one track up or down. Returns false at the boundary.
    pub fn move_track(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<bool, LayoutError> {
        self.check_index(index)?;
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.final_tracks.len() => index + 1,
            _ => return Ok(false),
        };
        self.final_tracks.swap(index, target);
        Ok(true)
    }

    pub fn track_config_mut(&mut self, index: usize) -> Option<&mut TrackConfig> {
        self.final_tracks.get_mut(index).map(|t| &mut t.config)
    }

    /// Replace the attachment selection.
    ///
    /// Sources the job doesn't have are dropped.
    pub fn set_attachment_sources(&mut self, sources: impl IntoIterator<Item = SourceIndex>) {
        self.attachment_sources.clear();
        for source in sources {
            if self.job.sources.contains_key(&source) {
                self.attachment_sources.insert(source);
            } else {
                tracing::warn!(
                    "Ignoring attachments from {}: not a source of this job",
                    source
                );
            }
        }
    }

    /// Register an external subtitle file as a selectable track.
    ///
    /// The codec follows the extension (srt, ass/ssa, sup).
    pub fn add_external_subtitle(&mut self, path: impl AsRef<Path>) -> &SourceTrack {
        let path = path.as_ref();
        let codec = match path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .as_deref()
        {
            Some("srt") => "S_TEXT/UTF8",
            Some("ass") | Some("ssa") => "S_TEXT/ASS",
            Some("sup") => "S_HDMV/PGS",
            _ => "",
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let track = SourceTrack::new(self.next_external_id, TrackType::Subtitles, codec)
            .with_name(name)
            .with_path(path.to_string_lossy());
        self.next_external_id += 1;

        self.external_tracks.push(track);
        let index = self.external_tracks.len() - 1;
        &self.external_tracks[index]
    }

    /// Current working layout.
    pub fn layout(&self) -> Layout {
        Layout {
            final_tracks: self.final_tracks.clone(),
            attachment_sources: self.attachment_sources.clone(),
        }
    }

    /// Accept the layout: the job with it stored and status `Configured`.
    pub fn finalize(&self) -> Result<Job, LayoutError> {
        if self.final_tracks.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }

        let mut job = self.job.clone();
        job.layout = self.layout();
        job.status = JobStatus::Configured;
        tracing::debug!(
            "Configured '{}' with {} tracks",
            job.name,
            job.layout.track_count()
        );
        Ok(job)
    }

    /// Discard edits and give the job back unchanged.
    pub fn into_job(self) -> Job {
        self.job
    }

    fn check_index(&self, index: usize) -> Result<(), LayoutError> {
        if index < self.final_tracks.len() {
            Ok(())
        } else {
            Err(LayoutError::IndexOutOfRange {
                index,
                len: self.final_tracks.len(),
            })
        }
    }
}
