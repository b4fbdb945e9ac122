use serde::{Deserialize, Serialize};

/// Outcome bucket of the result table.
///
/// A score belongs to the first bucket (by ascending threshold) whose
/// threshold is strictly greater than the score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    pub threshold: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The externally supplied result table. Order in the file is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResultTable {
    pub results: Vec<Outcome>,
}

impl ResultTable {
    pub fn new(results: Vec<Outcome>) -> Self {
        Self { results }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
