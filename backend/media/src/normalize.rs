//! Image normalization ahead of recognition.
//!
//! Decodes the upload, forces 8-bit RGB, converts to grayscale and binarizes
//! with a fixed global threshold. No adaptive thresholding, deskew or
//! denoise is applied.

use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::contrast::{ThresholdType, threshold};
use labelscan_core::LabelError;
use tracing::debug;

/// Intensity at or above which a pixel becomes white.
pub const DEFAULT_THRESHOLD: u8 = 150;

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Decoded image in RGB, kept untouched for annotation.
    pub color: RgbImage,
    /// Black/white raster fed to the recognizer.
    pub binary: GrayImage,
}

/// Decode `bytes` and produce the color and binarized rasters.
pub fn normalize(bytes: &[u8], cutoff: u8) -> Result<NormalizedImage, LabelError> {
    if bytes.is_empty() {
        return Err(LabelError::InvalidInput("No image provided".into()));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| LabelError::InvalidInput(format!("could not decode image: {e}")))?;

    // Alpha and higher bit depths are dropped here.
    let color = decoded.to_rgb8();
    let gray = imageops::grayscale(&color);
    let binary = binarize(&gray, cutoff);

    debug!(
        width = color.width(),
        height = color.height(),
        cutoff,
        "Normalized upload"
    );

    Ok(NormalizedImage { color, binary })
}

/// Pixels `>= cutoff` become 255, the rest 0.
pub fn binarize(gray: &GrayImage, cutoff: u8) -> GrayImage {
    match cutoff.checked_sub(1) {
        // imageproc's binary threshold is strict (`> t`).
        Some(strict) => threshold(gray, strict, ThresholdType::Binary),
        None => GrayImage::from_pixel(gray.width(), gray.height(), Luma([255])),
    }
}
