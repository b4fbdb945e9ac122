use chrono::{DateTime, Locale, TimeZone};
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 850;

const CENTER_X: f32 = CANVAS_WIDTH as f32 / 2.0;
const FRAME_INSET: f32 = 20.0;
const FRAME_WIDTH: f32 = 12.0;
const PORTRAIT_SIZE: f32 = 160.0;
const PORTRAIT_TOP: f32 = 610.0;
const RING_WIDTH: f32 = 4.0;

pub const BACKGROUND: Color = Color::hex(0xf8f4ec);
pub const ACCENT: Color = Color::hex(0x8b0000);
pub const INK: Color = Color::hex(0x000000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontStyle::Regular => write!(f, "regular"),
            FontStyle::Bold => write!(f, "bold"),
            FontStyle::Italic => write!(f, "italic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    /// Pixel height
    pub size: f32,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self { style: FontStyle::Regular, size }
    }

    pub const fn bold(size: f32) -> Self {
        Self { style: FontStyle::Bold, size }
    }

    pub const fn italic(size: f32) -> Self {
        Self { style: FontStyle::Italic, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A single drawing operation. Surfaces replay these in order.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    /// Stroke centred on the rectangle's outline
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    /// Text horizontally centred on `center_x`, sitting on `baseline_y`
    Text {
        text: String,
        center_x: f32,
        baseline_y: f32,
        font: FontSpec,
        color: Color,
    },
    /// Image scaled to `size`x`size` at (`x`, `y`) and clipped to the inscribed circle
    CircularImage {
        image: Arc<RgbaImage>,
        x: f32,
        y: f32,
        size: f32,
    },
    StrokeCircle {
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: Color,
        line_width: f32,
    },
}

impl DrawCommand {
    /// One-line human readable form, used by the dry-run surface
    pub fn describe(&self) -> String {
        match self {
            DrawCommand::FillRect { rect, color } => format!(
                "fill_rect {},{} {}x{} {}",
                rect.x, rect.y, rect.width, rect.height, color
            ),
            DrawCommand::StrokeRect { rect, color, line_width } => format!(
                "stroke_rect {},{} {}x{} {} w{}",
                rect.x, rect.y, rect.width, rect.height, color, line_width
            ),
            DrawCommand::Text { text, center_x, baseline_y, font, color } => format!(
                "text {} {} @{},{} {} {:?}",
                font.style, font.size, center_x, baseline_y, color, text
            ),
            DrawCommand::CircularImage { image, x, y, size } => format!(
                "circular_image {},{} {} from {}x{}",
                x,
                y,
                size,
                image.width(),
                image.height()
            ),
            DrawCommand::StrokeCircle { center_x, center_y, radius, color, line_width } => format!(
                "stroke_circle {},{} r{} {} w{}",
                center_x, center_y, radius, color, line_width
            ),
        }
    }
}

/// Accumulates drawing commands in call order.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    commands: Vec<DrawCommand>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_rect(mut self, rect: Rect, color: Color) -> Self {
        self.commands.push(DrawCommand::FillRect { rect, color });
        self
    }

    pub fn stroke_rect(mut self, rect: Rect, color: Color, line_width: f32) -> Self {
        self.commands.push(DrawCommand::StrokeRect { rect, color, line_width });
        self
    }

    pub fn centered_text(mut self, text: impl Into<String>, baseline_y: f32, font: FontSpec, color: Color) -> Self {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            center_x: CENTER_X,
            baseline_y,
            font,
            color,
        });
        self
    }

    pub fn circular_image(mut self, image: Arc<RgbaImage>, x: f32, y: f32, size: f32) -> Self {
        self.commands.push(DrawCommand::CircularImage { image, x, y, size });
        self
    }

    pub fn stroke_circle(mut self, center_x: f32, center_y: f32, radius: f32, color: Color, line_width: f32) -> Self {
        self.commands.push(DrawCommand::StrokeCircle {
            center_x,
            center_y,
            radius,
            color,
            line_width,
        });
        self
    }

    pub fn build(self) -> Vec<DrawCommand> {
        self.commands
    }
}

/// Background, frame, title, body lines and issue date, in drawing order.
pub fn text_layer(name: &str, score_label: &str, issued_on: &str) -> Vec<DrawCommand> {
    let full = Rect {
        x: 0.0,
        y: 0.0,
        width: CANVAS_WIDTH as f32,
        height: CANVAS_HEIGHT as f32,
    };
    let frame = Rect {
        x: FRAME_INSET,
        y: FRAME_INSET,
        width: CANVAS_WIDTH as f32 - 2.0 * FRAME_INSET,
        height: CANVAS_HEIGHT as f32 - 2.0 * FRAME_INSET,
    };

    LayoutBuilder::new()
        .fill_rect(full, BACKGROUND)
        .stroke_rect(frame, ACCENT, FRAME_WIDTH)
        .centered_text("CERTIFICAT OFICIAL", 120.0, FontSpec::bold(52.0), ACCENT)
        .centered_text("Se acordă prezentul certificat lui:", 260.0, FontSpec::regular(26.0), INK)
        .centered_text(name, 320.0, FontSpec::bold(40.0), INK)
        .centered_text("pentru finalizarea cu succes a testului", 380.0, FontSpec::regular(26.0), INK)
        .centered_text("„Stângometrului”", 420.0, FontSpec::italic(30.0), INK)
        .centered_text(format!("Scor obținut: {}", score_label), 490.0, FontSpec::bold(34.0), INK)
        .centered_text(format!("Data emiterii: {}", issued_on), 560.0, FontSpec::regular(22.0), INK)
        .build()
}

/// Circular portrait below the text block, outlined with an accent ring.
pub fn portrait_layer(image: Arc<RgbaImage>) -> Vec<DrawCommand> {
    let x = CENTER_X - PORTRAIT_SIZE / 2.0;
    let radius = PORTRAIT_SIZE / 2.0;

    LayoutBuilder::new()
        .circular_image(image, x, PORTRAIT_TOP, PORTRAIT_SIZE)
        .stroke_circle(x + radius, PORTRAIT_TOP + radius, radius, ACCENT, RING_WIDTH)
        .build()
}

/// Issue date in Romanian long form, e.g. "05 martie 2026"
pub fn format_issue_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format_localized("%d %B %Y", Locale::ro_RO).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_color_hex() {
        assert_eq!(ACCENT, Color { r: 0x8b, g: 0, b: 0 });
        assert_eq!(BACKGROUND.to_string(), "#f8f4ec");
    }

    #[test]
    fn test_text_layer_order() {
        let commands = text_layer("Ana Pop", "+12.5 cm", "05 martie 2026");
        assert_eq!(commands.len(), 9);
        assert!(matches!(commands[0], DrawCommand::FillRect { color: BACKGROUND, .. }));
        assert!(matches!(
            commands[1],
            DrawCommand::StrokeRect { color: ACCENT, line_width, .. } if line_width == 12.0
        ));

        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "CERTIFICAT OFICIAL",
                "Se acordă prezentul certificat lui:",
                "Ana Pop",
                "pentru finalizarea cu succes a testului",
                "„Stângometrului”",
                "Scor obținut: +12.5 cm",
                "Data emiterii: 05 martie 2026",
            ]
        );
    }

    #[test]
    fn test_text_is_centred() {
        for command in text_layer("X", "0.0 cm", "01 ianuarie 2026") {
            if let DrawCommand::Text { center_x, .. } = command {
                assert_eq!(center_x, 600.0);
            }
        }
    }

    #[test]
    fn test_portrait_layer_geometry() {
        let image = Arc::new(RgbaImage::new(40, 30));
        let commands = portrait_layer(image);
        assert_eq!(commands.len(), 2);
        match &commands[0] {
            DrawCommand::CircularImage { x, y, size, .. } => {
                assert_eq!((*x, *y, *size), (520.0, 610.0, 160.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            commands[1].describe(),
            "stroke_circle 600,690 r80 #8b0000 w4"
        );
    }

    #[test]
    fn test_describe() {
        let commands = text_layer("Ion", "-3.0 cm", "10 mai 2026");
        assert_eq!(commands[0].describe(), "fill_rect 0,0 1200x850 #f8f4ec");
        assert_eq!(commands[1].describe(), "stroke_rect 20,20 1160x810 #8b0000 w12");
        assert_eq!(
            commands[2].describe(),
            "text bold 52 @600,120 #8b0000 \"CERTIFICAT OFICIAL\""
        );
    }

    #[test]
    fn test_format_issue_date() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_issue_date(&at), "05 martie 2026");

        let at = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
        assert_eq!(format_issue_date(&at), "16 octombrie 2026");
    }
}
