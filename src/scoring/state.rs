use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::content::{QuestionKind, QuestionSet};

/// Recorded answer for one question.
///
/// Serializes as a bare index for single-choice and as an index array for
/// multiple-choice, which is the shape the results view expects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl Answer {
    pub fn contains(&self, response: usize) -> bool {
        match self {
            Answer::Single(index) => *index == response,
            Answer::Multiple(set) => set.contains(&response),
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        match self {
            Answer::Single(index) => vec![*index],
            Answer::Multiple(set) => set.iter().copied().collect(),
        }
    }
}

/// Question index -> recorded answer
pub type AnswerState = BTreeMap<usize, Answer>;

/// A user action fed to the scoring reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectSingle { question: usize, response: usize },
    ToggleMultiple { question: usize, response: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("question {0} does not exist")]
    UnknownQuestion(usize),
    #[error("question {question} has no response {response}")]
    UnknownResponse { question: usize, response: usize },
    #[error("question {question} is {actual:?}, action needs {expected:?}")]
    WrongKind {
        question: usize,
        expected: QuestionKind,
        actual: QuestionKind,
    },
    #[error("score out of range after question {question} response {response}")]
    ScoreOverflow { question: usize, response: usize },
}

/// Score and answers of one attempt.
///
/// Transitions never mutate in place: `apply` returns the next state, so the
/// invariant `score == recompute_score(questions, answers)` can be checked
/// between any two states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    score: i64,
    answers: AnswerState,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    pub fn answer(&self, question: usize) -> Option<&Answer> {
        self.answers.get(&question)
    }

    /// Compute the state that follows `action`.
    pub fn apply(&self, questions: &QuestionSet, action: Action) -> Result<SessionState, ScoringError> {
        match action {
            Action::SelectSingle { question, response } => {
                self.select_single(questions, question, response)
            }
            Action::ToggleMultiple { question, response } => {
                self.toggle_multiple(questions, question, response)
            }
        }
    }

    fn select_single(
        &self,
        questions: &QuestionSet,
        question: usize,
        response: usize,
    ) -> Result<SessionState, ScoringError> {
        let q = checked_question(questions, question, QuestionKind::SingleChoice)?;
        let value = checked_value(questions, question, response)?;

        let overflow = ScoringError::ScoreOverflow { question, response };
        let mut score = self.score;
        if let Some(Answer::Single(previous)) = self.answers.get(&question) {
            // A recorded index was validated when it was recorded
            let previous = q.responses.get(*previous).map_or(0, |r| r.value);
            score = score.checked_sub(previous).ok_or(overflow.clone())?;
        }
        let score = score.checked_add(value).ok_or(overflow)?;

        let mut answers = self.answers.clone();
        answers.insert(question, Answer::Single(response));

        Ok(SessionState { score, answers })
    }

    fn toggle_multiple(
        &self,
        questions: &QuestionSet,
        question: usize,
        response: usize,
    ) -> Result<SessionState, ScoringError> {
        let q = checked_question(questions, question, QuestionKind::MultipleChoice)?;
        let value = checked_value(questions, question, response)?;

        let mut selected = match self.answers.get(&question) {
            Some(Answer::Multiple(set)) => set.clone(),
            _ => BTreeSet::new(),
        };

        let score = if selected.remove(&response) {
            self.score.checked_sub(value)
        } else {
            if let Some(max) = q.capacity() {
                if selected.len() >= max {
                    tracing::debug!(question, response, max, "selection limit reached, ignoring toggle");
                    return Ok(self.clone());
                }
            }
            selected.insert(response);
            self.score.checked_add(value)
        };
        let score = score.ok_or(ScoringError::ScoreOverflow { question, response })?;

        let mut answers = self.answers.clone();
        if selected.is_empty() {
            answers.remove(&question);
        } else {
            answers.insert(question, Answer::Multiple(selected));
        }

        Ok(SessionState { score, answers })
    }

    /// True when every question has a valid recorded answer:
    /// any index for single-choice, a non-empty set for multiple-choice.
    pub fn is_complete(&self, questions: &QuestionSet) -> bool {
        questions.iter().all(|(index, question)| {
            match (question.kind, self.answers.get(&index)) {
                (QuestionKind::SingleChoice, Some(Answer::Single(_))) => true,
                (QuestionKind::MultipleChoice, Some(Answer::Multiple(set))) => !set.is_empty(),
                _ => false,
            }
        })
    }
}

fn checked_question(
    questions: &QuestionSet,
    question: usize,
    expected: QuestionKind,
) -> Result<&crate::content::Question, ScoringError> {
    let q = questions
        .get(question)
        .ok_or(ScoringError::UnknownQuestion(question))?;
    if q.kind != expected {
        return Err(ScoringError::WrongKind {
            question,
            expected,
            actual: q.kind,
        });
    }
    Ok(q)
}

fn checked_value(questions: &QuestionSet, question: usize, response: usize) -> Result<i64, ScoringError> {
    questions
        .get(question)
        .and_then(|q| q.response(response))
        .map(|r| r.value)
        .ok_or(ScoringError::UnknownResponse { question, response })
}

/// Sum of the values of every recorded response, `None` when it does not fit
/// in an `i64`.
pub fn recompute_score(questions: &QuestionSet, answers: &AnswerState) -> Option<i64> {
    let total: i128 = answers
        .iter()
        .flat_map(|(question, answer)| {
            answer
                .indices()
                .into_iter()
                .filter_map(move |response| {
                    questions
                        .get(*question)
                        .and_then(|q| q.response(response))
                        .map(|r| i128::from(r.value))
                })
        })
        .sum();
    i64::try_from(total).ok()
}
