pub mod prompt;

pub use prompt::Prompter;

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::content::QuestionKind;
use crate::output::{format_question, format_score_label};
use crate::results::Submission;
use crate::scoring::ScoringEngine;

/// Parse a 1-based choice into a 0-based index below `count`
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

fn ask_question<R: BufRead, W: Write>(
    engine: &mut ScoringEngine<'_>,
    prompter: &mut Prompter<R, W>,
    index: usize,
    use_colors: bool,
) -> Result<()> {
    let questions = engine.questions();
    let Some(question) = questions.get(index) else {
        return Ok(());
    };
    let count = question.responses.len();

    loop {
        let rendered = format_question(
            index,
            questions.len(),
            question,
            |r| engine.answer(index).is_some_and(|a| a.contains(r)),
            use_colors,
        );
        prompter.say("")?;
        prompter.say(&rendered)?;

        match question.kind {
            QuestionKind::SingleChoice => {
                let input = prompter.prompt(&format!("Alege un răspuns (1-{}): ", count))?;
                match parse_choice(&input, count) {
                    Some(response) => {
                        engine.select_single(index, response)?;
                        return Ok(());
                    }
                    None => prompter.say("  Răspuns invalid. Încearcă din nou.")?,
                }
            }
            QuestionKind::MultipleChoice => {
                let input = prompter.prompt(&format!(
                    "Comută un răspuns (1-{}), Enter pentru a continua: ",
                    count
                ))?;
                if input.is_empty() {
                    if engine.answer(index).is_some() {
                        return Ok(());
                    }
                    prompter.say("  Alege cel puțin un răspuns.")?;
                    continue;
                }
                match parse_choice(&input, count) {
                    Some(response) => {
                        let was_selected = engine.answer(index).is_some_and(|a| a.contains(response));
                        engine.toggle_multiple(index, response)?;
                        let now_selected = engine.answer(index).is_some_and(|a| a.contains(response));
                        if !was_selected && !now_selected {
                            prompter.say("  Ai atins numărul maxim de răspunsuri.")?;
                        }
                    }
                    None => prompter.say("  Răspuns invalid. Încearcă din nou.")?,
                }
            }
        }
    }
}

/// Walk the user through every question, then let them revisit answers
/// until they submit. Returns the handoff for the results view.
pub fn run_questionnaire<R: BufRead, W: Write>(
    engine: &mut ScoringEngine<'_>,
    prompter: &mut Prompter<R, W>,
    use_colors: bool,
) -> Result<Submission> {
    let total = engine.questions().len();
    for index in 0..total {
        ask_question(engine, prompter, index, use_colors)?;
    }

    loop {
        prompter.say("")?;
        prompter.say(&format!("Scor curent: {}", format_score_label(engine.score())))?;
        let input = prompter.prompt(&format!(
            "Enter pentru a finaliza testul, sau numărul unei întrebări (1-{}) pentru a o schimba: ",
            total
        ))?;

        if input.is_empty() {
            if let Some(submission) = engine.submit() {
                tracing::debug!(score = submission.score, "test submitted");
                return Ok(submission);
            }
            prompter.say("  Mai sunt întrebări fără răspuns.")?;
            continue;
        }

        match parse_choice(&input, total) {
            Some(index) => ask_question(engine, prompter, index, use_colors)?,
            None => prompter.say("  Număr de întrebare invalid.")?,
        }
    }
}

/// Name and optional avatar path entered for a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    pub name: String,
    pub avatar: Option<PathBuf>,
}

/// Ask whether to generate a certificate and collect its details.
/// The name is required; the image path may be left empty.
pub fn prompt_certificate_details<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<CertificateDetails>> {
    prompter.say("")?;
    if !prompter.prompt_yes_no("Generezi un certificat?", false)? {
        return Ok(None);
    }

    let name = loop {
        let name = prompter.prompt("Nume: ")?;
        if !name.is_empty() {
            break name;
        }
        prompter.say("  Numele nu poate fi gol.")?;
    };

    let avatar = prompter.prompt("Imagine (cale, opțional): ")?;
    let avatar = if avatar.is_empty() {
        None
    } else {
        Some(PathBuf::from(avatar))
    };

    prompter.say("Confidențialitate: numele și imaginea sunt procesate exclusiv local.")?;
    Ok(Some(CertificateDetails { name, avatar }))
}
