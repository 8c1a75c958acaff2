//! Filesystem sink writing one markdown file per discrepancy document.

use schedule_application::{DiscrepancySink, SinkError};
use schedule_domain::DiscrepancyDocument;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `discrepancy-<scenario>.md` files into a directory.
///
/// The directory is created on first write. A rerun of the same scenario
/// overwrites its previous document.
pub struct MarkdownFileSink {
    dir: PathBuf,
}

impl MarkdownFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DiscrepancySink for MarkdownFileSink {
    fn persist(&self, document: &DiscrepancyDocument) -> Result<String, SinkError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SinkError::Write {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })?;

        let path = self.dir.join(document.file_name());
        std::fs::write(&path, document.to_markdown()).map_err(|e| SinkError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!("Wrote {}", path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_domain::{
        AdapterId, ConsensusEngine, DiscrepancyReporter, ValidationResult, find_scenario,
    };

    fn document() -> DiscrepancyDocument {
        let scenario = find_scenario("full-week").unwrap();
        let report = ConsensusEngine::compare(
            scenario.clone(),
            [
                (AdapterId::Golden, ValidationResult::valid(7).into()),
                (AdapterId::Backend, ValidationResult::valid(6).into()),
            ]
            .into_iter()
            .collect(),
        );
        DiscrepancyReporter::report(&scenario, &report).unwrap()
    }

    #[test]
    fn test_persist_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MarkdownFileSink::new(dir.path().join("nested").join("reports"));

        let location = sink.persist(&document()).unwrap();

        let path = PathBuf::from(&location);
        assert!(path.ends_with("discrepancy-full-week.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Discrepancy Report: full-week"));
        assert!(content.contains("NIGHTS_MISMATCH"));
    }

    #[test]
    fn test_persist_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MarkdownFileSink::new(dir.path());

        sink.persist(&document()).unwrap();
        sink.persist(&document()).unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_ids_with_the_same_slug_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MarkdownFileSink::new(dir.path());

        let mut first = document();
        first.scenario_id = "adhoc 1/2".to_string();
        let mut second = document();
        second.scenario_id = "adhoc_1_2".to_string();

        let a = sink.persist(&first).unwrap();
        let b = sink.persist(&second).unwrap();

        assert_ne!(a, b);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
        assert!(std::fs::read_to_string(a).unwrap().contains("adhoc 1/2"));
    }

    #[test]
    fn test_persist_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = MarkdownFileSink::new(&blocker).persist(&document()).unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }
}
