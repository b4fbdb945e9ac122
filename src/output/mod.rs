pub mod formatter;
pub mod ruler;

pub use formatter::{
    format_question, format_results_view, format_score_label, format_value_badge,
    get_terminal_width, should_use_colors,
};
pub use ruler::{format_ruler, ruler_position};
