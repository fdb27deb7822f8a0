//! Job discovery from source paths.
//!
//! Input is one path per source position; an empty path means "not set".
//! If the reference is a file, the inputs form a single job. If it is a
//! folder, every file in it is matched by name against the other folders.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::Job;
use crate::models::SourceIndex;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Reference path must exist: {0}")]
    ReferenceNotFound(PathBuf),

    #[error("If the reference is a folder, the other sources must be folders too")]
    MixedInputs,

    #[error("Failed to read folder {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A job found on disk, not yet queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredJob {
    pub name: String,
    /// Matched files, numbered from Source 1 without gaps.
    pub source_paths: BTreeMap<SourceIndex, PathBuf>,
}

impl DiscoveredJob {
    pub fn into_job(self) -> Job {
        Job::with_sources(self.name, self.source_paths)
    }
}

fn derive_job_name(reference: &Path) -> String {
    reference
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unnamed Job".to_string())
}

fn is_set(path: &Path) -> bool {
    !path.as_os_str().is_empty()
}

/// Number matched paths Source 1, 2, ... in input order.
fn numbered(paths: impl IntoIterator<Item = PathBuf>) -> BTreeMap<SourceIndex, PathBuf> {
    paths
        .into_iter()
        .enumerate()
        .map(|(i, p)| (SourceIndex::new(i), p))
        .collect()
}

/// Find jobs for the given source paths (index 0 is the reference).
///
/// An empty result means nothing matched; callers fall back to
/// [`jobs_from_paths`].
pub fn discover_jobs(paths: &[PathBuf]) -> Result<Vec<DiscoveredJob>, DiscoveryError> {
    let reference = paths
        .first()
        .filter(|p| is_set(p) && p.exists())
        .ok_or_else(|| {
            DiscoveryError::ReferenceNotFound(paths.first().cloned().unwrap_or_default())
        })?;
    let others: Vec<&PathBuf> = paths.iter().skip(1).filter(|p| is_set(p)).collect();

    if reference.is_file() {
        let matched = others.iter().filter(|p| p.is_file()).map(|p| (*p).clone());
        return Ok(vec![DiscoveredJob {
            name: derive_job_name(reference),
            source_paths: numbered(std::iter::once(reference.clone()).chain(matched)),
        }]);
    }

    if others.iter().any(|p| p.is_file()) {
        return Err(DiscoveryError::MixedInputs);
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(reference)
        .map_err(|source| DiscoveryError::ReadDir {
            path: reference.clone(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let mut jobs = Vec::new();
    for file in entries {
        let Some(file_name) = file.file_name() else {
            continue;
        };

        let matched: Vec<PathBuf> = others
            .iter()
            .map(|folder| folder.join(file_name))
            .filter(|candidate| candidate.is_file())
            .collect();
        if matched.is_empty() {
            continue;
        }

        jobs.push(DiscoveredJob {
            name: derive_job_name(&file),
            source_paths: numbered(std::iter::once(file.clone()).chain(matched)),
        });
    }

    tracing::info!("Discovered {} jobs in {}", jobs.len(), reference.display());
    Ok(jobs)
}

/// One job straight from the paths, without matching.
///
/// None when no reference path is set.
pub fn jobs_from_paths(paths: &[PathBuf]) -> Option<DiscoveredJob> {
    let reference = paths.first().filter(|p| is_set(p))?;

    Some(DiscoveredJob {
        name: derive_job_name(reference),
        source_paths: numbered(paths.iter().filter(|p| is_set(p)).cloned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn missing_reference_is_an_error() {
        let result = discover_jobs(&[PathBuf::from("/nonexistent/ref.mkv")]);
        assert!(matches!(result, Err(DiscoveryError::ReferenceNotFound(_))));
        assert!(matches!(
            discover_jobs(&[]),
            Err(DiscoveryError::ReferenceNotFound(_))
        ));
    }

    #[test]
    fn file_reference_makes_one_job() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("Episode 01.mkv");
        let secondary = dir.path().join("jp.mkv");
        touch(&reference);
        touch(&secondary);

        let jobs = discover_jobs(&[reference.clone(), secondary.clone(), PathBuf::new()]).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name, "Episode 01");
        assert_eq!(jobs[0].source_paths.len(), 2);
        assert_eq!(jobs[0].source_paths[&SourceIndex::new(1)], secondary);
    }

    #[test]
    fn folders_match_by_file_name() {
        let dir = tempdir().unwrap();
        let (ref_dir, sec_dir, ter_dir) = (
            dir.path().join("ref"),
            dir.path().join("sec"),
            dir.path().join("ter"),
        );
        touch(&ref_dir.join("b.mkv"));
        touch(&ref_dir.join("a.mkv"));
        touch(&ref_dir.join("lonely.mkv"));
        touch(&sec_dir.join("a.mkv"));
        touch(&ter_dir.join("a.mkv"));
        touch(&ter_dir.join("b.mkv"));

        let jobs = discover_jobs(&[ref_dir.clone(), sec_dir, ter_dir.clone()]).unwrap();
        let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(jobs[0].source_paths.len(), 3);
        // "b" only matched in the third folder and moves up to Source 2.
        let b_keys: Vec<String> = jobs[1].source_paths.keys().map(|k| k.key()).collect();
        assert_eq!(b_keys, vec!["Source 1", "Source 2"]);
        assert_eq!(
            jobs[1].source_paths[&SourceIndex::reference()],
            ref_dir.join("b.mkv")
        );
        assert_eq!(
            jobs[1].source_paths[&SourceIndex::new(1)],
            ter_dir.join("b.mkv")
        );
    }

    #[test]
    fn folder_with_file_is_mixed() {
        let dir = tempdir().unwrap();
        let ref_dir = dir.path().join("ref");
        let file = dir.path().join("one.mkv");
        touch(&ref_dir.join("a.mkv"));
        touch(&file);

        assert!(matches!(
            discover_jobs(&[ref_dir, file]),
            Err(DiscoveryError::MixedInputs)
        ));
    }

    #[test]
    fn nothing_matched_is_empty() {
        let dir = tempdir().unwrap();
        let ref_dir = dir.path().join("ref");
        let sec_dir = dir.path().join("sec");
        touch(&ref_dir.join("a.mkv"));
        fs::create_dir_all(&sec_dir).unwrap();

        assert!(discover_jobs(&[ref_dir, sec_dir]).unwrap().is_empty());
    }

    #[test]
    fn fallback_job_from_paths() {
        let paths = [
            PathBuf::from("/m/show.mkv"),
            PathBuf::new(),
            PathBuf::from("/m/extra.mka"),
        ];
        let found = jobs_from_paths(&paths).unwrap();
        assert_eq!(found.name, "show");
        let keys: Vec<String> = found.source_paths.keys().map(|k| k.key()).collect();
        assert_eq!(keys, vec!["Source 1", "Source 2"]);
        assert_eq!(
            found.source_paths[&SourceIndex::new(1)],
            PathBuf::from("/m/extra.mka")
        );

        let job = found.into_job();
        assert_eq!(job.name, "show");
        assert!(!job.is_ready());

        assert!(jobs_from_paths(&[PathBuf::new()]).is_none());
    }
}
