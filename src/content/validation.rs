use super::questions::{QuestionKind, QuestionSet};
use super::results::ResultTable;

/// Validate a question set.
/// Returns all validation errors at once (not just the first).
pub fn validate_questions(set: &QuestionSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if set.is_empty() {
        errors.push("questions: at least one question is required".to_string());
    }

    for (i, question) in set.iter() {
        if question.question.trim().is_empty() {
            errors.push(format!("questions[{}].question: must not be empty", i));
        }

        if question.responses.is_empty() {
            errors.push(format!("questions[{}].responses: at least one response is required", i));
        }

        for (j, response) in question.responses.iter().enumerate() {
            if response.text.trim().is_empty() {
                errors.push(format!("questions[{}].responses[{}].text: must not be empty", i, j));
            }
        }

        // Odd maxSelect values still leave the question answerable
        match (question.kind, question.max_select) {
            (QuestionKind::SingleChoice, Some(max)) => {
                tracing::warn!(question = i, max, "maxSelect ignored on a single-choice question");
            }
            (QuestionKind::MultipleChoice, Some(max)) if max > question.responses.len() => {
                tracing::warn!(
                    question = i,
                    max,
                    responses = question.responses.len(),
                    "maxSelect exceeds the available responses"
                );
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a result table.
/// Duplicate thresholds are allowed; ties resolve by file order.
pub fn validate_results(table: &ResultTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if table.is_empty() {
        errors.push("results: at least one result is required".to_string());
    }

    for (i, outcome) in table.results.iter().enumerate() {
        if outcome.text.trim().is_empty() {
            errors.push(format!("results[{}].text: must not be empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
