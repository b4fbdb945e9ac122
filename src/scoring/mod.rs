pub mod engine;
pub mod state;

pub use engine::ScoringEngine;
pub use state::{recompute_score, Action, Answer, AnswerState, ScoringError, SessionState};
