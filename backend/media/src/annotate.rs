//! Draws OCR detections onto a copy of the original image.
//!
//! Each detection gets an axis-aligned box spanning its quad's top-left and
//! bottom-right corners. Rotation of the quad is ignored, so slanted text gets
//! a loose box. The recognized string is written just above the box when a
//! font is available.

use std::path::Path;

use ab_glyph::FontArc;
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use labelscan_core::{LabelError, Point, RecognitionResult};
use tracing::{debug, info};

/// Fonts probed when none is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub color: Rgb<u8>,
    /// Box outline thickness in pixels, grown outwards.
    pub stroke_width: u32,
    /// Label glyph height in pixels.
    pub font_scale: f32,
    /// Gap between the label baseline and the box top.
    pub label_offset: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            stroke_width: 2,
            font_scale: 16.0,
            label_offset: 10,
        }
    }
}

#[derive(Clone)]
pub struct Annotator {
    style: AnnotationStyle,
    font: Option<FontArc>,
}

impl Annotator {
    pub fn new(style: AnnotationStyle, font: Option<FontArc>) -> Self {
        Self { style, font }
    }

    /// Use the font file at `path` for labels.
    pub fn with_font_path(style: AnnotationStyle, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let font = FontArc::try_from_vec(data)
            .with_context(|| format!("Failed to parse font file: {}", path.display()))?;
        Ok(Self::new(style, Some(font)))
    }

    /// Probe common system font locations; boxes only if none loads.
    pub fn with_system_font(style: AnnotationStyle) -> Self {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(data) = std::fs::read(path) {
                if let Ok(font) = FontArc::try_from_vec(data) {
                    info!(path, "Loaded annotation font");
                    return Self::new(style, Some(font));
                }
            }
        }
        debug!("No system font found, detection labels will be skipped");
        Self::new(style, None)
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Draw every detection onto a copy of `image`.
    ///
    /// Fails on the first detection whose quad does not have exactly four
    /// points; nothing is returned in that case.
    pub fn render(
        &self,
        image: &RgbImage,
        detections: &[RecognitionResult],
    ) -> Result<RgbImage, LabelError> {
        let mut canvas = image.clone();

        for (index, detection) in detections.iter().enumerate() {
            let (top_left, bottom_right) = detection.diagonal().ok_or_else(|| {
                LabelError::Render(format!(
                    "detection {index} ({:?}) has {} quad points, expected 4",
                    detection.text,
                    detection.quad.len()
                ))
            })?;

            let (left, top) = self.draw_box(&mut canvas, top_left, bottom_right);
            self.draw_label(&mut canvas, left, top, &detection.text);
        }

        Ok(canvas)
    }

    /// Returns the box's top-left corner after normalizing the diagonal.
    ///
    /// Edges are clamped just outside the canvas so extreme engine
    /// coordinates cannot overflow the rect size.
    fn draw_box(&self, canvas: &mut RgbImage, a: Point, b: Point) -> (i64, i64) {
        let (left, right) = (a.x.min(b.x) as i64, a.x.max(b.x) as i64);
        let (top, bottom) = (a.y.min(b.y) as i64, a.y.max(b.y) as i64);

        let margin = self.style.stroke_width as i64 + 1;
        let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);
        let clamp_x = |x: i64| x.clamp(-margin, canvas_w + margin);
        let clamp_y = |y: i64| y.clamp(-margin, canvas_h + margin);
        let (x0, x1) = (clamp_x(left), clamp_x(right));
        let (y0, y1) = (clamp_y(top), clamp_y(bottom));

        for grow in 0..self.style.stroke_width as i64 {
            let width = (x1 - x0 + 1 + 2 * grow) as u32;
            let height = (y1 - y0 + 1 + 2 * grow) as u32;
            let rect = Rect::at((x0 - grow) as i32, (y0 - grow) as i32).of_size(width, height);
            draw_hollow_rect_mut(canvas, rect, self.style.color);
        }

        (left, top)
    }

    fn draw_label(&self, canvas: &mut RgbImage, left: i64, top: i64, text: &str) {
        let Some(font) = &self.font else { return };
        if text.is_empty() {
            return;
        }
        let y = top - self.style.label_offset as i64 - self.style.font_scale.round() as i64;
        // Off-canvas either way; nothing to draw.
        let (Ok(x), Ok(y)) = (i32::try_from(left), i32::try_from(y)) else {
            return;
        };
        draw_text_mut(canvas, self.style.color, x, y, self.style.font_scale, font, text);
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default(), None)
    }
}
