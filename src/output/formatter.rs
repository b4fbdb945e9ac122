use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use super::ruler::format_ruler;
use crate::content::Question;
use crate::results::{ResultsView, ReviewedQuestion};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
pub fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a score as centimetres with one decimal.
/// Positive scores get a leading "+", zero and negative scores do not.
/// This is the label printed on the certificate.
pub fn format_score_label(score: i64) -> String {
    let cm = score as f64 / 10.0;
    if score > 0 {
        format!("+{:.1} cm", cm)
    } else {
        format!("{:.1} cm", cm)
    }
}

/// Format a response value as a signed badge ("+10", "-5", "0")
pub fn format_value_badge(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// Format a question for the interactive test: counter, text, hint and
/// numbered responses (1-based). `selected` marks responses already chosen.
pub fn format_question(
    index: usize,
    total: usize,
    question: &Question,
    selected: impl Fn(usize) -> bool,
    use_colors: bool,
) -> String {
    let counter = format!("{}/{}", index + 1, total);
    let hint = question.selection_hint();

    let mut lines = Vec::with_capacity(question.responses.len() + 2);
    if use_colors {
        lines.push(format!("{} {}", counter.magenta().bold(), question.question.bold()));
        lines.push(format!("{}", hint.magenta()));
    } else {
        lines.push(format!("{} {}", counter, question.question));
        lines.push(hint);
    }
    if let Some(ref photo) = question.photo {
        lines.push(format_image_line(photo, use_colors));
    }

    for (i, response) in question.responses.iter().enumerate() {
        let mark = if selected(i) { "[x]" } else { "[ ]" };
        let line = format!("  {:>2}. {} {}", i + 1, mark, response.text);
        if use_colors && selected(i) {
            lines.push(format!("{}", line.bold()));
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

fn format_image_line(path: &str, use_colors: bool) -> String {
    if use_colors {
        format!("Imagine: {}", path.dimmed())
    } else {
        format!("Imagine: {}", path)
    }
}

fn format_review(review: &[ReviewedQuestion], use_colors: bool) -> String {
    let mut lines = Vec::new();

    for question in review {
        lines.push(String::new());
        if use_colors {
            lines.push(format!("{}", question.question.bold()));
        } else {
            lines.push(question.question.clone());
        }
        if let Some(ref photo) = question.photo {
            lines.push(format_image_line(photo, use_colors));
        }
        if let Some(ref explanation) = question.explanation {
            let text = format!("EXPLICAȚIE: {}", explanation);
            if use_colors {
                lines.push(format!("{}", text.magenta()));
            } else {
                lines.push(text);
            }
        }

        for response in &question.responses {
            let badge = format_value_badge(response.value);
            let marker = if response.selected { "Selectat" } else { "" };
            if use_colors {
                let badge = if response.value >= 0 {
                    format!("{}", badge.green())
                } else {
                    format!("{}", badge.red())
                };
                let text = if response.selected {
                    format!("{}", response.text.bold())
                } else {
                    response.text.clone()
                };
                lines.push(format!("  {:>8} {} ({})", marker.cyan().to_string(), text, badge));
            } else {
                lines.push(format!("  {:>8} {} ({})", marker, response.text, badge));
            }
        }
    }

    lines.join("\n")
}

/// Format the full results screen.
pub fn format_results_view(view: &ResultsView, use_colors: bool) -> String {
    match view {
        ResultsView::NoResults => {
            let title = "Nu există rezultate";
            let body = "Nu s-au găsit rezultate. Te rugăm să completezi testul mai întâi \
                        (stangometru take).";
            if use_colors {
                format!("{}\n{}", title.bold(), body.dimmed())
            } else {
                format!("{}\n{}", title, body)
            }
        }
        ResultsView::Available {
            score,
            label,
            outcome,
            review,
        } => {
            let width = get_terminal_width().unwrap_or(80).min(100);
            let mut out = Vec::new();

            if use_colors {
                out.push(format!("Rezultatul Tău: {}", label.magenta().bold()));
            } else {
                out.push(format!("Rezultatul Tău: {}", label));
            }
            out.push(String::new());
            out.push(format_ruler(*score, width, use_colors));

            if let Some(outcome) = outcome {
                out.push(String::new());
                if use_colors {
                    out.push(format!("{}", outcome.text.bold()));
                } else {
                    out.push(outcome.text.clone());
                }
                if let Some(ref image) = outcome.image {
                    out.push(format_image_line(image, use_colors));
                }
            }

            if !review.is_empty() {
                out.push(String::new());
                out.push("Răspunsurile tale".to_string());
                out.push(format_review(review, use_colors));
            }

            out.join("\n")
        }
    }
}
