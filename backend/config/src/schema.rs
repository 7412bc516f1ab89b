//! labelscan runtime configuration schema.
//!
//! Every section may be omitted from the file; missing sections and keys
//! take their defaults. Keys are camelCase in YAML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_THRESHOLD: u8 = 150;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelScanConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub ocr: OcrConfig,
    pub normalize: NormalizeConfig,
    pub annotation: AnnotationConfig,
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Larger request bodies are rejected with 413.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            allow_credentials: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    /// Filled from the config directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_model: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition_model: Option<PathBuf>,
    /// Run at most one recognition at a time.
    pub serialize_access: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizeConfig {
    pub threshold: u8,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationConfig {
    /// System fonts are probed when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    pub font_scale: f32,
    pub stroke_width: u32,
    pub label_offset: i32,
    pub jpeg_quality: u8,
    pub color: [u8; 3],
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_scale: 16.0,
            stroke_width: 2,
            label_offset: 10,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            color: [0, 255, 0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfig {
    pub extra_labels: ExtraLabels,
}

/// Synonyms appended after the built-in labels of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraLabels {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manufacturing_date: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expiry_date: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_name: Vec<String>,
}

impl ExtraLabels {
    pub fn is_empty(&self) -> bool {
        self.manufacturing_date.is_empty()
            && self.expiry_date.is_empty()
            && self.company_name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Daily rolling JSON logs are written here when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: LabelScanConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, LabelScanConfig::default());
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(cfg.normalize.threshold, 150);
        assert_eq!(cfg.annotation.color, [0, 255, 0]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r#"
server:
  port: 9100
annotation:
  jpegQuality: 80
extraction:
  extraLabels:
    companyName: ["Imported by"]
"#;
        let cfg: LabelScanConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.bind_address, "0.0.0.0");
        assert_eq!(cfg.annotation.jpeg_quality, 80);
        assert_eq!(cfg.annotation.stroke_width, 2);
        assert_eq!(cfg.extraction.extra_labels.company_name, vec!["Imported by"]);
        assert!(cfg.extraction.extra_labels.expiry_date.is_empty());
    }

    #[test]
    fn socket_addr_joins_bind_and_port() {
        assert_eq!(ServerConfig::default().socket_addr(), "0.0.0.0:8000");
    }
}
