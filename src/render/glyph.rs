//! Tile composition: icons fitted to the key, labels and the item list

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use super::RenderError;

/// Tile handed to the device, before conversion to its native format
pub type KeyImage = RgbaImage;

/// Primary text color
pub const PRIMARY: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Color of the list lines around the selection
pub const DIMMED: Rgba<u8> = Rgba([128, 128, 128, 255]);
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Height in pixels that layout positions are expressed against
pub const REFERENCE_SIZE: f32 = 64.0;

/// Baselines of the three list lines on the reference tile
const LIST_BASELINES: [f32; 3] = [19.0, 39.0, 59.0];

/// Baseline of an icon label on the reference tile
const LABEL_BASELINE: f32 = 59.0;

/// Pixel dimensions of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyShape {
    pub width: u32,
    pub height: u32,
}

impl KeyShape {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn ratio(&self) -> f32 {
        self.height as f32 / REFERENCE_SIZE
    }
}

fn blank(shape: KeyShape) -> RgbaImage {
    RgbaImage::from_pixel(shape.width, shape.height, BACKGROUND)
}

/// Fit `icon` inside the key preserving aspect ratio, centered on black
pub fn scaled_key_image(shape: KeyShape, icon: &DynamicImage) -> RgbaImage {
    let mut canvas = blank(shape);
    if icon.width() == 0 || icon.height() == 0 {
        return canvas;
    }
    let fitted = icon.resize(shape.width, shape.height, FilterType::Lanczos3).to_rgba8();
    let x = (shape.width.saturating_sub(fitted.width())) / 2;
    let y = (shape.height.saturating_sub(fitted.height())) / 2;
    imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
    canvas
}

/// One line of text to draw on a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLine<'a> {
    pub text: &'a str,
    pub color: Rgba<u8>,
    /// Baseline in pixels from the top of the tile
    pub baseline: f32,
}

/// Where an icon label goes, `None` for an empty label
pub fn label_line(shape: KeyShape, label: &str) -> Option<TextLine<'_>> {
    if label.is_empty() {
        return None;
    }
    Some(TextLine {
        text: label,
        color: PRIMARY,
        baseline: LABEL_BASELINE * shape.ratio(),
    })
}

/// Icon tile with `label` centered horizontally near the bottom edge
pub fn render_icon_label(
    shape: KeyShape,
    icon: &DynamicImage,
    font: &impl Font,
    font_size: f32,
    label: &str,
) -> KeyImage {
    let mut canvas = scaled_key_image(shape, icon);
    if let Some(line) = label_line(shape, label) {
        let scale = em_scale(font, font_size * shape.ratio());
        draw_centered(&mut canvas, &line, scale, font);
    }
    canvas
}

/// The (above, current, below) names around `center`, wrapping at both ends
pub fn list_window(items: &[String], center: usize) -> Option<[&str; 3]> {
    let len = items.len();
    if len == 0 {
        return None;
    }
    let center = center % len;
    let above = (center + len - 1) % len;
    let below = (center + 1) % len;
    Some([&items[above], &items[center], &items[below]])
}

/// Lines of the list tile: the selection in the middle at full brightness,
/// its neighbours dimmed above and below
pub fn list_lines(
    shape: KeyShape,
    items: &[String],
    selected: usize,
) -> Result<[TextLine<'_>; 3], RenderError> {
    let names = list_window(items, selected).ok_or(RenderError::NoItems)?;
    let line = |row: usize| TextLine {
        text: names[row],
        color: if row == 1 { PRIMARY } else { DIMMED },
        baseline: LIST_BASELINES[row] * shape.ratio(),
    };
    Ok([line(0), line(1), line(2)])
}

/// Three-line list tile with the selected item in the middle
pub fn render_list(
    shape: KeyShape,
    font: &impl Font,
    font_size: f32,
    items: &[String],
    selected: usize,
) -> Result<KeyImage, RenderError> {
    let lines = list_lines(shape, items, selected)?;
    let mut canvas = blank(shape);
    let scale = em_scale(font, font_size * shape.ratio());
    for line in &lines {
        draw_centered(&mut canvas, line, scale, font);
    }
    Ok(canvas)
}

/// Scale for a font whose em square is `px_per_em` pixels tall
fn em_scale(font: &impl Font, px_per_em: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(px_per_em * font.height_unscaled() / units),
        _ => PxScale::from(px_per_em),
    }
}

/// Draw a line centered horizontally with its baseline in place
fn draw_centered(canvas: &mut RgbaImage, line: &TextLine<'_>, scale: PxScale, font: &impl Font) {
    let (text_width, _) = text_size(scale, font, line.text);
    let ascent = font.as_scaled(scale).ascent();
    let x = (canvas.width() as i32 - text_width as i32) / 2;
    let y = (line.baseline - ascent).round() as i32;
    draw_text_mut(canvas, line.color, x, y, scale, font, line.text);
}
