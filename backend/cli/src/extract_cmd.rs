//! CLI Extract Command
//!
//! Runs the pipeline on a local file and prints the response as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use labelscan_core::ExtractionResponse;
use labelscan_media::LabelPipeline;
use serde_json::Value;
use tracing::info;

pub async fn run(pipeline: &LabelPipeline, image: &Path, annotated_out: Option<&Path>) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let response = pipeline.process(&bytes).await?;
    let output = render_output(response, annotated_out).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// With `annotated_out`, the JPEG goes to disk and the base64 field is dropped.
async fn render_output(response: ExtractionResponse, annotated_out: Option<&Path>) -> Result<Value> {
    let mut value = serde_json::to_value(&response)?;
    if let Some(path) = annotated_out {
        let jpeg = STANDARD
            .decode(&response.ocr_output_image)
            .context("Annotated image is not valid base64")?;
        tokio::fs::write(path, jpeg)
            .await
            .with_context(|| format!("Failed to write annotated image: {}", path.display()))?;
        info!(path = %path.display(), "Wrote annotated image");
        if let Value::Object(map) = &mut value {
            map.remove("ocr_output_image");
        }
    }
    Ok(value)
}
