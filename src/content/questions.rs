use serde::{Deserialize, Serialize};

/// How a question accepts answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
}

/// A single answer option and the signed score delta it carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    pub text: String,
    pub value: i64,
}

/// One question of the questionnaire.
///
/// Example JSON:
/// ```json
/// {
///   "type": "multiple-choice",
///   "maxSelect": 2,
///   "question": "Ce citești dimineața?",
///   "responses": [
///     { "text": "Ziarul", "value": 10 },
///     { "text": "Nimic", "value": -5 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Upper bound on selections, only meaningful for multiple-choice.
    /// Absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_select: Option<usize>,

    /// Relative path of an illustration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    pub question: String,

    /// Shown next to the question when reviewing answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    pub responses: Vec<Response>,
}

impl Question {
    /// Capacity of a multiple-choice question, `None` when unbounded.
    /// A `maxSelect` of 0 counts as unbounded. Single-choice questions
    /// never report a capacity.
    pub fn capacity(&self) -> Option<usize> {
        match self.kind {
            QuestionKind::SingleChoice => None,
            QuestionKind::MultipleChoice => self.max_select.filter(|max| *max > 0),
        }
    }

    /// Hint telling the user how many answers the question takes
    pub fn selection_hint(&self) -> String {
        match (self.kind, self.capacity()) {
            (QuestionKind::SingleChoice, _) => "Un singur răspuns".to_string(),
            (QuestionKind::MultipleChoice, Some(max)) => {
                format!("Răspunsuri multiple! Maxim {} răspunsuri.", max)
            }
            (QuestionKind::MultipleChoice, None) => "Răspunsuri multiple!".to_string(),
        }
    }

    pub fn response(&self, index: usize) -> Option<&Response> {
        self.responses.get(index)
    }
}

/// The externally supplied question set, addressed by positional index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Question)> {
        self.questions.iter().enumerate()
    }
}
