use super::handoff::Submission;
use crate::content::{Outcome, QuestionSet, ResultTable};
use crate::output::format_score_label;
use crate::resolver::resolve;

/// One response line in the answer review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedResponse {
    pub text: String,
    pub value: i64,
    pub selected: bool,
}

/// A question with every response marked selected or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedQuestion {
    pub question: String,
    /// Relative path of the question's photo
    pub photo: Option<String>,
    pub explanation: Option<String>,
    pub responses: Vec<ReviewedResponse>,
}

/// What the results screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Available {
        score: i64,
        /// Pre-formatted score, e.g. "+12.5 cm"
        label: String,
        outcome: Option<Outcome>,
        review: Vec<ReviewedQuestion>,
    },
    /// Nothing was handed over; the user should take the test first
    NoResults,
}

impl ResultsView {
    pub fn from_submission(
        submission: Option<Submission>,
        questions: &QuestionSet,
        results: &ResultTable,
    ) -> Self {
        let Some(submission) = submission else {
            return ResultsView::NoResults;
        };

        let review = questions
            .iter()
            .map(|(index, question)| {
                let answer = submission.selected_answers.get(&index);
                ReviewedQuestion {
                    question: question.question.clone(),
                    photo: question.photo.clone(),
                    explanation: question.explanation.clone(),
                    responses: question
                        .responses
                        .iter()
                        .enumerate()
                        .map(|(i, response)| ReviewedResponse {
                            text: response.text.clone(),
                            value: response.value,
                            selected: answer.is_some_and(|a| a.contains(i)),
                        })
                        .collect(),
                }
            })
            .collect();

        ResultsView::Available {
            score: submission.score,
            label: format_score_label(submission.score),
            outcome: resolve(submission.score, &results.results).cloned(),
            review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Question, QuestionKind, Response};
    use crate::scoring::{Answer, AnswerState};
    use std::collections::BTreeSet;

    fn questions() -> QuestionSet {
        QuestionSet::new(vec![
            Question {
                kind: QuestionKind::SingleChoice,
                max_select: None,
                photo: Some("poze/q0.jpg".to_string()),
                question: "Q0".to_string(),
                explanation: Some("De ce.".to_string()),
                responses: vec![
                    Response { text: "a".to_string(), value: 10 },
                    Response { text: "b".to_string(), value: -10 },
                ],
            },
            Question {
                kind: QuestionKind::MultipleChoice,
                max_select: None,
                photo: None,
                question: "Q1".to_string(),
                explanation: None,
                responses: vec![
                    Response { text: "c".to_string(), value: 1 },
                    Response { text: "d".to_string(), value: 2 },
                    Response { text: "e".to_string(), value: 3 },
                ],
            },
        ])
    }

    fn results() -> ResultTable {
        ResultTable::new(vec![
            Outcome { threshold: 0, text: "stânga".to_string(), image: None },
            Outcome { threshold: 100, text: "centru".to_string(), image: Some("centru.png".to_string()) },
        ])
    }

    #[test]
    fn test_missing_submission_is_no_results() {
        assert_eq!(
            ResultsView::from_submission(None, &questions(), &results()),
            ResultsView::NoResults
        );
    }

    #[test]
    fn test_available_view() {
        let mut answers = AnswerState::new();
        answers.insert(0, Answer::Single(0));
        answers.insert(1, Answer::Multiple(BTreeSet::from([0, 2])));
        let submission = Submission {
            score: 14,
            selected_answers: answers,
        };

        let view = ResultsView::from_submission(Some(submission), &questions(), &results());
        let ResultsView::Available { score, label, outcome, review } = view else {
            panic!("expected results");
        };

        assert_eq!(score, 14);
        assert_eq!(label, "+1.4 cm");
        let outcome = outcome.unwrap();
        assert_eq!(outcome.text, "centru");
        assert_eq!(outcome.image.as_deref(), Some("centru.png"));
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].photo.as_deref(), Some("poze/q0.jpg"));
        assert_eq!(review[1].photo, None);
        assert_eq!(review[0].explanation.as_deref(), Some("De ce."));

        let selected: Vec<bool> = review[1].responses.iter().map(|r| r.selected).collect();
        assert_eq!(selected, vec![true, false, true]);
        assert!(review[0].responses[0].selected);
        assert!(!review[0].responses[1].selected);
    }

    #[test]
    fn test_empty_result_table_has_no_outcome() {
        let submission = Submission {
            score: 0,
            selected_answers: AnswerState::new(),
        };
        let view = ResultsView::from_submission(Some(submission), &questions(), &ResultTable::default());
        assert!(matches!(view, ResultsView::Available { outcome: None, .. }));
    }
}
