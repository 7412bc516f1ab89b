use serde::{Deserialize, Serialize};

/// Integer pixel coordinate in the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One OCR-localized text region.
///
/// `quad` is expected to hold four points ordered clockwise from the
/// top-left corner. The shape is not enforced here: a malformed quad is an
/// engine contract breach and is reported by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub quad: Vec<Point>,
    pub text: String,
    pub confidence: f32,
}

impl RecognitionResult {
    pub fn new(quad: Vec<Point>, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// Build an axis-aligned detection from its edges.
    pub fn from_edges(
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        text: impl Into<String>,
        confidence: f32,
    ) -> Self {
        let quad = vec![
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ];
        Self::new(quad, text, confidence)
    }

    /// Top-left and bottom-right corners, when the quad is well formed.
    pub fn diagonal(&self) -> Option<(Point, Point)> {
        match self.quad.as_slice() {
            [top_left, _, bottom_right, _] => Some((*top_left, *bottom_right)),
            _ => None,
        }
    }
}

/// Packaging metadata inferred from the recognized text.
///
/// Fields are `None` when nothing matched; an extracted value is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub company_name: Option<String>,
    /// Left in the notation found on the label.
    pub manufacturing_date: Option<String>,
    /// Absolute date text or a relative duration such as `"12 Days"`.
    pub expiry_date: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.manufacturing_date.is_none()
            && self.expiry_date.is_none()
    }

    /// Number of fields that carry a value.
    pub fn found(&self) -> usize {
        [
            &self.company_name,
            &self.manufacturing_date,
            &self.expiry_date,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Response payload for one extraction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(flatten)]
    pub fields: ExtractedFields,
    /// Base64-encoded JPEG of the annotated image.
    pub ocr_output_image: String,
    /// Recognized strings in engine order, duplicates kept.
    pub recognized_text: Vec<String>,
}
