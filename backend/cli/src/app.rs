//! Wires configuration into a ready-to-run pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use labelscan_config::{AnnotationConfig, ExtraLabels, LabelScanConfig, OcrConfig};
use labelscan_core::TextRecognizer;
use labelscan_media::{AnnotationStyle, Annotator, LabelPipeline};
use labelscan_ocr::{ModelPaths, OcrsRecognizer, SerializedRecognizer};
use labelscan_understanding::{FieldExtractor, LabelField};
use tracing::info;

pub fn build_pipeline(config: &LabelScanConfig) -> Result<LabelPipeline> {
    let recognizer = build_recognizer(&config.ocr)?;
    let pipeline = LabelPipeline::new(recognizer)
        .with_extractor(build_extractor(&config.extraction.extra_labels)?)
        .with_annotator(build_annotator(&config.annotation)?)
        .with_threshold(config.normalize.threshold)
        .with_jpeg_quality(config.annotation.jpeg_quality);
    Ok(pipeline)
}

fn build_recognizer(config: &OcrConfig) -> Result<Arc<dyn TextRecognizer>> {
    let paths = model_paths(config)?;
    let engine = OcrsRecognizer::load(&paths)?;
    if config.serialize_access {
        info!("OCR access is serialized");
        Ok(Arc::new(SerializedRecognizer::new(engine)))
    } else {
        Ok(Arc::new(engine))
    }
}

fn model_paths(config: &OcrConfig) -> Result<ModelPaths> {
    let detection = config
        .detection_model
        .as_ref()
        .context("ocr.detectionModel is not set")?;
    let recognition = config
        .recognition_model
        .as_ref()
        .context("ocr.recognitionModel is not set")?;
    Ok(ModelPaths::new(detection, recognition))
}

fn build_extractor(extra: &ExtraLabels) -> Result<FieldExtractor> {
    if extra.is_empty() {
        return Ok(FieldExtractor::standard().clone());
    }
    let labels = HashMap::from([
        (LabelField::ManufacturingDate, extra.manufacturing_date.clone()),
        (LabelField::ExpiryDate, extra.expiry_date.clone()),
        (LabelField::CompanyName, extra.company_name.clone()),
    ]);
    FieldExtractor::with_extra_labels(&labels).context("Invalid extraction.extraLabels")
}

fn build_annotator(config: &AnnotationConfig) -> Result<Annotator> {
    let style = AnnotationStyle {
        color: config.color.into(),
        stroke_width: config.stroke_width,
        font_scale: config.font_scale,
        label_offset: config.label_offset,
    };
    match &config.font_path {
        Some(path) => Annotator::with_font_path(style, path),
        None => Ok(Annotator::with_system_font(style)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extra_labels_extend_the_standard_synonyms() {
        let extra = ExtraLabels {
            company_name: vec!["Imported by".into()],
            ..Default::default()
        };
        let extractor = build_extractor(&extra).unwrap();
        let fields = extractor.extract(&["Imported by Globex Ltd"]);
        assert_eq!(fields.company_name.as_deref(), Some("Globex Ltd"));
    }

    #[test]
    fn annotator_takes_style_from_config() {
        let cfg = AnnotationConfig {
            color: [255, 0, 0],
            stroke_width: 3,
            ..Default::default()
        };
        let annotator = build_annotator(&cfg).unwrap();
        assert_eq!(annotator.style().color.0, [255, 0, 0]);
        assert_eq!(annotator.style().stroke_width, 3);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let cfg = AnnotationConfig {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Default::default()
        };
        assert!(build_annotator(&cfg).is_err());
    }

    #[test]
    fn unset_model_path_is_reported() {
        let err = model_paths(&OcrConfig::default()).unwrap_err();
        assert!(err.to_string().contains("ocr.detectionModel"));
    }
}
