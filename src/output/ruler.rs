use owo_colors::OwoColorize;

/// Lowest score shown on the ruler
pub const RULER_MIN: i64 = -100;
/// Highest score shown on the ruler
pub const RULER_MAX: i64 = 400;
/// Distance between ticks, in score points
pub const TICK_STEP: i64 = 50;

/// Narrowest ruler that fits a label under every tick
const MIN_WIDTH: usize = 51;

/// Position of `score` along the ruler in percent, clamped to 0..=100
pub fn ruler_position(score: i64) -> f64 {
    let range = (RULER_MAX - RULER_MIN) as f64;
    let position = (score - RULER_MIN) as f64 / range * 100.0;
    position.clamp(0.0, 100.0)
}

fn column(percent: f64, width: usize) -> usize {
    ((percent / 100.0) * (width - 1) as f64).round() as usize
}

fn tick_label(value: i64) -> String {
    let cm = value / 10;
    if cm > 0 {
        format!("+{}", cm)
    } else {
        cm.to_string()
    }
}

/// Overwrite `text` into `line` starting at `start`, shifted left if it
/// would run past the end
fn place(line: &mut [char], start: usize, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > line.len() {
        return;
    }
    let start = start.min(line.len() - chars.len());
    line[start..start + chars.len()].copy_from_slice(&chars);
}

/// Render the score ruler as three lines: marker, rule with ticks, and a
/// label in centimetres under every tick.
pub fn format_ruler(score: i64, width: usize, use_colors: bool) -> String {
    let width = width.max(MIN_WIDTH);

    let mut rule = vec!['─'; width];
    let mut labels = vec![' '; width];
    let mut value = RULER_MIN;
    while value <= RULER_MAX {
        let col = column(ruler_position(value), width);
        rule[col] = '┼';
        let label = tick_label(value);
        place(&mut labels, col.saturating_sub(label.chars().count() / 2), &label);
        value += TICK_STEP;
    }
    rule[0] = '├';
    rule[width - 1] = '┤';

    let marker_col = column(ruler_position(score), width);
    let mut marker = vec![' '; width];
    marker[marker_col] = '▼';

    let rule: String = rule.into_iter().collect();
    let marker: String = marker.into_iter().collect::<String>().trim_end().to_string();
    let labels: String = labels.into_iter().collect::<String>().trim_end().to_string();

    if use_colors {
        format!("{}\n{}\n{} cm", marker.magenta().bold(), rule.dimmed(), labels.dimmed())
    } else {
        format!("{}\n{}\n{} cm", marker, rule, labels)
    }
}
