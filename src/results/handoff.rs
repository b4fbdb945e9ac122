use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::scoring::AnswerState;

/// What the test hands over to the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub score: i64,
    pub selected_answers: AnswerState,
}

/// Load an exported submission.
///
/// A missing file is not an error: it yields `None`, which the results view
/// renders as "no results".
pub fn load_submission(path: &Path) -> Result<Option<Submission>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no submission found");
        return Ok(None);
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open submission file at {}", path.display()))?;

    let submission: Submission =
        serde_json::from_reader(file).context("Failed to load submission")?;

    Ok(Some(submission))
}

/// Export a submission to a JSON file atomically
pub fn save_submission(path: &Path, submission: &Submission) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, submission).context("Failed to serialize submission")?;

    file.commit().context("Failed to save submission")?;

    tracing::info!(path = %path.display(), "submission exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Answer;
    use std::collections::BTreeSet;

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_submission(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempt.json");

        let mut answers = AnswerState::new();
        answers.insert(0, Answer::Single(2));
        answers.insert(3, Answer::Multiple(BTreeSet::from([1, 4])));
        let submission = Submission {
            score: -45,
            selected_answers: answers,
        };

        save_submission(&path, &submission).unwrap();
        let loaded = load_submission(&path).unwrap();
        assert_eq!(loaded, Some(submission));
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{ "score": 120, "selectedAnswers": { "0": 1, "1": [0, 2] } }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.score, 120);
        assert_eq!(submission.selected_answers.get(&0), Some(&Answer::Single(1)));
        assert_eq!(
            submission.selected_answers.get(&1),
            Some(&Answer::Multiple(BTreeSet::from([0, 2])))
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempt.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_submission(&path).is_err());
    }
}
