use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::GrayImage;

use crate::error::LabelError;
use crate::types::RecognitionResult;

/// Seam to the optical character recognition engine.
///
/// An implementation is built once at startup and shared by reference across
/// concurrent requests, so `recognize` takes `&self`. Implementations that
/// are not safe for concurrent invocation must serialize internally.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Engine name, for logs.
    fn name(&self) -> &str;

    /// Run recognition once over a binarized raster.
    ///
    /// Detections come back in the engine's native order.
    async fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognitionResult>, LabelError>;
}

/// A recognizer that replays canned detections.
///
/// Used by tests where no model files are present.
pub struct ScriptedRecognizer {
    detections: Vec<RecognitionResult>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn new(detections: Vec<RecognitionResult>) -> Self {
        Self {
            detections,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A recognizer whose every call fails with the given engine message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            detections: Vec::new(),
            failure: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&self, _image: &GrayImage) -> Result<Vec<RecognitionResult>, LabelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(LabelError::RecognitionEngine(message.clone())),
            None => Ok(self.detections.clone()),
        }
    }
}
