use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect as PixelRect;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::error::CertificateError;
use super::layout::{Color, DrawCommand, FontStyle, Rect};
use super::surface::{Surface, SurfaceProvider};

/// Font files used for certificate text. Bold and italic fall back to regular.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FontPaths {
    pub regular: PathBuf,
    #[serde(default)]
    pub bold: Option<PathBuf>,
    #[serde(default)]
    pub italic: Option<PathBuf>,
}

impl Default for FontPaths {
    fn default() -> Self {
        let dir = Path::new("/usr/share/fonts/truetype/dejavu");
        Self {
            regular: dir.join("DejaVuSerif.ttf"),
            bold: Some(dir.join("DejaVuSerif-Bold.ttf")),
            italic: Some(dir.join("DejaVuSerif-Italic.ttf")),
        }
    }
}

struct FontSet {
    regular: FontVec,
    bold: Option<FontVec>,
    italic: Option<FontVec>,
}

fn load_font(path: &Path) -> Result<FontVec, CertificateError> {
    let bytes = std::fs::read(path).map_err(|e| {
        CertificateError::SurfaceUnavailable(format!("cannot read font {}: {}", path.display(), e))
    })?;
    FontVec::try_from_vec(bytes).map_err(|e| {
        CertificateError::SurfaceUnavailable(format!("invalid font {}: {}", path.display(), e))
    })
}

impl FontSet {
    fn load(paths: &FontPaths) -> Result<Self, CertificateError> {
        Ok(Self {
            regular: load_font(&paths.regular)?,
            bold: paths.bold.as_deref().map(load_font).transpose()?,
            italic: paths.italic.as_deref().map(load_font).transpose()?,
        })
    }

    fn for_style(&self, style: FontStyle) -> &FontVec {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            FontStyle::Italic => self.italic.as_ref().unwrap_or(&self.regular),
        }
    }
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

fn pixel_rect(x: i32, y: i32, width: i64, height: i64) -> Option<PixelRect> {
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(PixelRect::at(x, y).of_size(width as u32, height as u32))
}

fn fill_rect(canvas: &mut RgbaImage, rect: &Rect, color: Color) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    if let Some(r) = pixel_rect(x, y, rect.width.round() as i64, rect.height.round() as i64) {
        draw_filled_rect_mut(canvas, r, rgba(color));
    }
}

/// Stroke centred on the outline, as a canvas 2D context does
fn stroke_rect(canvas: &mut RgbaImage, rect: &Rect, color: Color, line_width: f32) {
    let lines = line_width.round().max(1.0) as i64;
    let x = rect.x.round() as i64;
    let y = rect.y.round() as i64;
    let w = rect.width.round() as i64;
    let h = rect.height.round() as i64;
    for i in 0..lines {
        let inset = i - lines / 2;
        if let Some(r) = pixel_rect((x + inset) as i32, (y + inset) as i32, w - 2 * inset, h - 2 * inset) {
            draw_hollow_rect_mut(canvas, r, rgba(color));
        }
    }
}

fn circular_image(canvas: &mut RgbaImage, image: &RgbaImage, x: f32, y: f32, size: f32) {
    let side = size.round().max(1.0) as u32;
    let scaled = imageops::resize(image, side, side, FilterType::Triangle);
    let radius = side as f32 / 2.0;
    let left = x.round() as i64;
    let top = y.round() as i64;

    for (dx, dy, pixel) in scaled.enumerate_pixels() {
        let fx = dx as f32 + 0.5 - radius;
        let fy = dy as f32 + 0.5 - radius;
        if fx * fx + fy * fy > radius * radius {
            continue;
        }
        let (px, py) = (left + dx as i64, top + dy as i64);
        if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
            continue;
        }
        if pixel.0[3] == u8::MAX {
            canvas.put_pixel(px as u32, py as u32, *pixel);
        } else {
            canvas.get_pixel_mut(px as u32, py as u32).blend(pixel);
        }
    }
}

fn stroke_circle(canvas: &mut RgbaImage, center_x: f32, center_y: f32, radius: f32, color: Color, line_width: f32) {
    let half = line_width.max(1.0) / 2.0;
    let outer = radius + half;
    let x0 = (center_x - outer).floor().max(0.0) as u32;
    let y0 = (center_y - outer).floor().max(0.0) as u32;
    let x1 = ((center_x + outer).ceil() as u32).min(canvas.width());
    let y1 = ((center_y + outer).ceil() as u32).min(canvas.height());
    let paint = rgba(color);

    for py in y0..y1 {
        for px in x0..x1 {
            let fx = px as f32 + 0.5 - center_x;
            let fy = py as f32 + 0.5 - center_y;
            let distance = (fx * fx + fy * fy).sqrt();
            if (distance - radius).abs() <= half {
                canvas.put_pixel(px, py, paint);
            }
        }
    }
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, CertificateError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| CertificateError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Pixel canvas backed by `image`, with text through `imageproc` + `ab_glyph`.
/// Only `RasterProvider::acquire` builds one, after its fonts loaded.
pub struct RasterSurface {
    canvas: RgbaImage,
    fonts: FontSet,
}

impl RasterSurface {
    fn text(&mut self, text: &str, center_x: f32, baseline_y: f32, style: FontStyle, size: f32, color: Color) {
        let font = self.fonts.for_style(style);
        let scale = PxScale::from(size);

        let (width, _) = text_size(scale, font, text);
        let ascent = font.as_scaled(scale).ascent();
        let x = (center_x - width as f32 / 2.0).round() as i32;
        let y = (baseline_y - ascent).round() as i32;

        draw_text_mut(&mut self.canvas, rgba(color), x, y, scale, font, text);
    }
}

impl Surface for RasterSurface {
    fn draw(&mut self, command: &DrawCommand) -> Result<(), CertificateError> {
        match command {
            DrawCommand::FillRect { rect, color } => fill_rect(&mut self.canvas, rect, *color),
            DrawCommand::StrokeRect { rect, color, line_width } => {
                stroke_rect(&mut self.canvas, rect, *color, *line_width)
            }
            DrawCommand::Text { text, center_x, baseline_y, font, color } => {
                self.text(text, *center_x, *baseline_y, font.style, font.size, *color)
            }
            DrawCommand::CircularImage { image, x, y, size } => {
                circular_image(&mut self.canvas, image, *x, *y, *size)
            }
            DrawCommand::StrokeCircle { center_x, center_y, radius, color, line_width } => {
                stroke_circle(&mut self.canvas, *center_x, *center_y, *radius, *color, *line_width)
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, CertificateError> {
        encode_png(self.canvas)
    }
}

/// Produces PNG surfaces. Fonts are loaded on every acquire, so a missing or
/// broken font file surfaces as `SurfaceUnavailable` for that render only.
#[derive(Debug, Clone)]
pub struct RasterProvider {
    fonts: FontPaths,
}

impl RasterProvider {
    pub fn new(fonts: FontPaths) -> Self {
        Self { fonts }
    }
}

impl SurfaceProvider for RasterProvider {
    type Surface = RasterSurface;

    fn acquire(&self, width: u32, height: u32) -> Result<RasterSurface, CertificateError> {
        if width == 0 || height == 0 {
            return Err(CertificateError::SurfaceUnavailable(format!(
                "invalid canvas size {}x{}",
                width, height
            )));
        }
        let fonts = FontSet::load(&self.fonts)?;
        Ok(RasterSurface {
            canvas: RgbaImage::new(width, height),
            fonts,
        })
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
