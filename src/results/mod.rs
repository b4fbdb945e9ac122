pub mod handoff;
pub mod view;

pub use handoff::{load_submission, save_submission, Submission};
pub use view::{ResultsView, ReviewedQuestion, ReviewedResponse};
