use super::state::{recompute_score, Action, Answer, AnswerState, ScoringError, SessionState};
use crate::content::QuestionSet;
use crate::results::Submission;

/// Single owner of the running score and answers for one attempt.
///
/// Every user interaction goes through [`ScoringEngine::dispatch`]; a rejected
/// action leaves the current state untouched.
#[derive(Debug)]
pub struct ScoringEngine<'q> {
    questions: &'q QuestionSet,
    state: SessionState,
}

impl<'q> ScoringEngine<'q> {
    pub fn new(questions: &'q QuestionSet) -> Self {
        Self {
            questions,
            state: SessionState::new(),
        }
    }

    pub fn questions(&self) -> &'q QuestionSet {
        self.questions
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> i64 {
        self.state.score()
    }

    pub fn answers(&self) -> &AnswerState {
        self.state.answers()
    }

    pub fn answer(&self, question: usize) -> Option<&Answer> {
        self.state.answer(question)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<&SessionState, ScoringError> {
        let next = self.state.apply(self.questions, action)?;
        debug_assert_eq!(
            Some(next.score()),
            recompute_score(self.questions, next.answers()),
            "score drifted from recorded answers"
        );
        tracing::debug!(?action, score = next.score(), "answer recorded");
        self.state = next;
        Ok(&self.state)
    }

    pub fn select_single(&mut self, question: usize, response: usize) -> Result<&SessionState, ScoringError> {
        self.dispatch(Action::SelectSingle { question, response })
    }

    pub fn toggle_multiple(&mut self, question: usize, response: usize) -> Result<&SessionState, ScoringError> {
        self.dispatch(Action::ToggleMultiple { question, response })
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete(self.questions)
    }

    /// Package the attempt for the results view.
    /// Returns `None` while the attempt is incomplete.
    pub fn submit(&self) -> Option<Submission> {
        if !self.is_complete() {
            return None;
        }
        Some(Submission {
            score: self.state.score(),
            selected_answers: self.state.answers().clone(),
        })
    }

    /// Start over with an empty attempt
    pub fn reset(&mut self) {
        self.state = SessionState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Question, QuestionKind, Response};

    fn sample_questions() -> QuestionSet {
        QuestionSet::new(vec![
            Question {
                kind: QuestionKind::SingleChoice,
                max_select: None,
                photo: None,
                question: "Q0".to_string(),
                explanation: None,
                responses: vec![
                    Response { text: "a".to_string(), value: 50 },
                    Response { text: "b".to_string(), value: -30 },
                ],
            },
            Question {
                kind: QuestionKind::MultipleChoice,
                max_select: Some(1),
                photo: None,
                question: "Q1".to_string(),
                explanation: None,
                responses: vec![
                    Response { text: "c".to_string(), value: 20 },
                    Response { text: "d".to_string(), value: 40 },
                ],
            },
        ])
    }

    #[test]
    fn test_engine_flow_and_submit() {
        let questions = sample_questions();
        let mut engine = ScoringEngine::new(&questions);

        engine.select_single(0, 0).unwrap();
        assert!(engine.submit().is_none());

        engine.toggle_multiple(1, 1).unwrap();
        engine.select_single(0, 1).unwrap();
        assert!(engine.is_complete());

        let submission = engine.submit().unwrap();
        assert_eq!(submission.score, 10);
        assert_eq!(submission.selected_answers.get(&0), Some(&Answer::Single(1)));
    }

    #[test]
    fn test_rejected_action_keeps_state() {
        let questions = sample_questions();
        let mut engine = ScoringEngine::new(&questions);
        engine.select_single(0, 0).unwrap();

        let before = engine.state().clone();
        assert!(engine.toggle_multiple(0, 1).is_err());
        assert!(engine.select_single(0, 7).is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_capacity_guard_through_engine() {
        let questions = sample_questions();
        let mut engine = ScoringEngine::new(&questions);
        engine.toggle_multiple(1, 0).unwrap();
        engine.toggle_multiple(1, 1).unwrap();
        assert_eq!(engine.score(), 20);
        assert!(engine.answer(1).unwrap().contains(0));
        assert!(!engine.answer(1).unwrap().contains(1));
    }

    #[test]
    fn test_reset() {
        let questions = sample_questions();
        let mut engine = ScoringEngine::new(&questions);
        engine.select_single(0, 0).unwrap();
        engine.reset();
        assert_eq!(engine.score(), 0);
        assert!(engine.answers().is_empty());
    }
}
