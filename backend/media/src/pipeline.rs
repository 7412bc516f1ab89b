use std::sync::Arc;

use labelscan_core::{ExtractionResponse, LabelError, TextRecognizer};
use labelscan_understanding::FieldExtractor;
use tracing::{debug, info, instrument};

use crate::annotate::Annotator;
use crate::assemble::{DEFAULT_JPEG_QUALITY, assemble};
use crate::normalize::{DEFAULT_THRESHOLD, normalize};

/// Request-scoped label extraction around a shared recognizer.
///
/// Holds no per-request state; one instance serves concurrent requests.
/// Any stage failure aborts the request with no partial result.
#[derive(Clone)]
pub struct LabelPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    extractor: FieldExtractor,
    annotator: Annotator,
    threshold: u8,
    jpeg_quality: u8,
}

impl LabelPipeline {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            recognizer,
            extractor: FieldExtractor::standard().clone(),
            annotator: Annotator::default(),
            threshold: DEFAULT_THRESHOLD,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Run the full pipeline over an uploaded image.
    ///
    /// Decoding, drawing and encoding run on the blocking pool so a large
    /// upload does not stall other requests.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub async fn process(&self, bytes: &[u8]) -> Result<ExtractionResponse, LabelError> {
        let threshold = self.threshold;
        let upload = bytes.to_vec();
        let normalized = run_blocking("normalize", move || normalize(&upload, threshold)).await?;

        let detections = self.recognizer.recognize(&normalized.binary).await?;
        let detection_count = detections.len();
        debug!(
            engine = self.recognizer.name(),
            detections = detection_count,
            "Recognition finished"
        );

        let recognized_text: Vec<String> = detections.iter().map(|d| d.text.clone()).collect();
        let fields = self.extractor.extract(&recognized_text);

        let annotator = self.annotator.clone();
        let quality = self.jpeg_quality;
        let response = run_blocking("annotate", move || {
            let annotated = annotator.render(&normalized.color, &detections)?;
            assemble(fields, recognized_text, &annotated, quality)
        })
        .await?;

        info!(
            detections = detection_count,
            fields_found = response.fields.found(),
            "Label extraction complete"
        );
        Ok(response)
    }
}

async fn run_blocking<T, F>(stage: &'static str, work: F) -> Result<T, LabelError>
where
    F: FnOnce() -> Result<T, LabelError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| LabelError::Other(anyhow::anyhow!("{stage} task failed: {e}")))?
}
