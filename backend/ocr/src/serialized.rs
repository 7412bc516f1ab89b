use async_trait::async_trait;
use image::GrayImage;
use labelscan_core::{LabelError, RecognitionResult, TextRecognizer};
use tokio::sync::Mutex;

/// Lets only one recognition run at a time through the wrapped engine.
pub struct SerializedRecognizer<R> {
    inner: R,
    gate: Mutex<()>,
}

impl<R: TextRecognizer> SerializedRecognizer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: TextRecognizer> TextRecognizer for SerializedRecognizer<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognitionResult>, LabelError> {
        let _guard = self.gate.lock().await;
        self.inner.recognize(image).await
    }
}
