use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{DynamicImage, GrayImage};
use labelscan_core::{LabelError, RecognitionResult, TextRecognizer};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use rten_imageproc::BoundingRect;
use tracing::{debug, info};

use crate::models::ModelPaths;

/// `ocrs` does not report per-line confidence.
const LINE_CONFIDENCE: f32 = 1.0;

/// Loads the ocrs models once; the engine is shared by all requests.
pub struct OcrsRecognizer {
    engine: Arc<OcrEngine>,
}

impl OcrsRecognizer {
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        paths.ensure_present()?;
        info!(
            detection = %paths.detection().display(),
            recognition = %paths.recognition().display(),
            "Loading OCR models"
        );

        let detection_model = Model::load_file(paths.detection())
            .context("Failed to load text detection model")?;
        let recognition_model = Model::load_file(paths.recognition())
            .context("Failed to load text recognition model")?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .context("Failed to create OCR engine")?;

        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

/// Detect, group into lines and read text. Lines that come back empty are
/// dropped; each remaining line is boxed by the union of its word rects.
fn recognize_lines(engine: &OcrEngine, image: &GrayImage) -> Result<Vec<RecognitionResult>> {
    let rgb = DynamicImage::ImageLuma8(image.clone()).to_rgb8();
    let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
        .context("Failed to wrap image for OCR")?;
    let input = engine.prepare_input(source)?;

    let word_rects = engine.detect_words(&input)?;
    let line_rects = engine.find_text_lines(&input, &word_rects);
    let line_texts = engine.recognize_text(&input, &line_rects)?;

    let mut results = Vec::new();
    for (words, line) in line_rects.iter().zip(line_texts.iter()) {
        let Some(line) = line else { continue };
        let text = line.to_string();
        if text.trim().is_empty() {
            continue;
        }
        let Some(first) = words.first() else { continue };
        let bbox = words
            .iter()
            .skip(1)
            .fold(first.bounding_rect(), |acc, w| acc.union(w.bounding_rect()));

        results.push(RecognitionResult::from_edges(
            bbox.left().round() as i32,
            bbox.top().round() as i32,
            bbox.right().round() as i32,
            bbox.bottom().round() as i32,
            text,
            LINE_CONFIDENCE,
        ));
    }
    Ok(results)
}

#[async_trait]
impl TextRecognizer for OcrsRecognizer {
    fn name(&self) -> &str {
        "ocrs"
    }

    async fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognitionResult>, LabelError> {
        let engine = Arc::clone(&self.engine);
        let image = image.clone();

        let results = tokio::task::spawn_blocking(move || recognize_lines(&engine, &image))
            .await
            .map_err(|e| LabelError::RecognitionEngine(format!("OCR task panicked: {e}")))?
            .map_err(|e| LabelError::RecognitionEngine(format!("{e:#}")))?;

        debug!(lines = results.len(), "ocrs recognition finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn load_fails_without_model_files() {
        let paths = ModelPaths::new("/nonexistent/det.rten", "/nonexistent/rec.rten");
        let err = OcrsRecognizer::load(&paths).err().unwrap();
        assert!(err.to_string().contains("not found"));
    }

    // Needs real models; run with:
    // LABELSCAN_MODELS_DIR=~/.labelscan/models cargo test -p labelscan-ocr -- --ignored
    #[tokio::test]
    #[ignore = "loads real ocrs models from LABELSCAN_MODELS_DIR"]
    async fn blank_image_yields_no_lines() {
        let dir = std::env::var("LABELSCAN_MODELS_DIR").expect("LABELSCAN_MODELS_DIR set");
        let recognizer = OcrsRecognizer::load(&ModelPaths::in_dir(dir)).unwrap();

        let blank = GrayImage::from_pixel(200, 80, Luma([255]));
        let lines = recognizer.recognize(&blank).await.unwrap();
        assert!(lines.is_empty());
    }
}
