pub mod questions;
pub mod results;
pub mod validation;

pub use questions::{Question, QuestionKind, QuestionSet, Response};
pub use results::{Outcome, ResultTable};
pub use validation::{validate_questions, validate_results};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file at {}", what, path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}: invalid JSON in {}", what, path.display()))
}

/// Load the question set from a JSON file
pub fn load_question_set(path: &Path) -> Result<QuestionSet> {
    let set: QuestionSet = load_json(path, "question set")?;
    tracing::debug!(path = %path.display(), questions = set.len(), "loaded question set");
    Ok(set)
}

/// Load the result table from a JSON file
pub fn load_result_table(path: &Path) -> Result<ResultTable> {
    let table: ResultTable = load_json(path, "result table")?;
    tracing::debug!(path = %path.display(), results = table.results.len(), "loaded result table");
    Ok(table)
}
