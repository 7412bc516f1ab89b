//! Config validation with user-friendly error messages.

use crate::schema::LabelScanConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &LabelScanConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_cors(config, &mut report);
    validate_ocr(config, &mut report);
    validate_annotation(config, &mut report);
    validate_extraction(config, &mut report);
    report
}

fn validate_server(config: &LabelScanConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "port must be > 0");
    }
    if server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "bindAddress cannot be empty");
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "maxUploadBytes must be > 0");
    }
}

fn validate_cors(config: &LabelScanConfig, report: &mut ValidationReport) {
    let cors = &config.cors;
    if cors.allowed_origins.is_empty() {
        report.warn(
            "cors.allowedOrigins",
            "No origins allowed; browsers on other origins cannot call the API",
        );
    }
    for (i, origin) in cors.allowed_origins.iter().enumerate() {
        let path = format!("cors.allowedOrigins[{i}]");
        if origin.trim().is_empty() {
            report.error(path, "Origin cannot be empty");
        } else if origin == "*" && cors.allow_credentials {
            report.error(path, "Wildcard origin cannot be combined with allowCredentials");
        } else if origin != "*" && !is_valid_origin(origin) {
            report.error(
                path,
                format!("Origin '{}' must be an http(s) scheme and host", origin.escape_debug()),
            );
        }
    }
}

/// `scheme://host[:port]` with no path and no whitespace or control chars.
fn is_valid_origin(origin: &str) -> bool {
    let Some((scheme, host)) = origin.split_once("://") else {
        return false;
    };
    matches!(scheme, "http" | "https")
        && !host.is_empty()
        && !host.contains('/')
        && !origin.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn validate_ocr(config: &LabelScanConfig, report: &mut ValidationReport) {
    let models = [
        ("ocr.detectionModel", &config.ocr.detection_model),
        ("ocr.recognitionModel", &config.ocr.recognition_model),
    ];
    for (path, model) in models {
        match model {
            Some(p) if !p.is_file() => {
                report.warn(path, format!("Model file not found: {}", p.display()))
            }
            Some(_) => {}
            None => report.warn(path, "No model path configured"),
        }
    }
}

fn validate_annotation(config: &LabelScanConfig, report: &mut ValidationReport) {
    let ann = &config.annotation;
    if !(1..=100).contains(&ann.jpeg_quality) {
        report.error(
            "annotation.jpegQuality",
            format!("jpegQuality must be within 1..=100, got {}", ann.jpeg_quality),
        );
    }
    if ann.stroke_width == 0 {
        report.error("annotation.strokeWidth", "strokeWidth must be >= 1");
    }
    if !(ann.font_scale.is_finite() && ann.font_scale > 0.0) {
        report.error("annotation.fontScale", "fontScale must be a positive number");
    }
    if let Some(font) = &ann.font_path {
        if !font.is_file() {
            report.warn(
                "annotation.fontPath",
                format!("Font file not found: {}", font.display()),
            );
        }
    }
}

fn validate_extraction(config: &LabelScanConfig, report: &mut ValidationReport) {
    let extra = &config.extraction.extra_labels;
    let fields = [
        ("manufacturingDate", &extra.manufacturing_date),
        ("expiryDate", &extra.expiry_date),
        ("companyName", &extra.company_name),
    ];
    for (field, labels) in fields {
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                report.error(
                    format!("extraction.extraLabels.{field}[{i}]"),
                    "Label cannot be blank",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_errors() {
        let report = validate(&LabelScanConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        // Model paths are only filled in by defaults.
        assert!(report.warnings.iter().any(|w| w.path == "ocr.detectionModel"));
    }

    #[test]
    fn zero_port_and_bad_quality_are_errors() {
        let mut cfg = LabelScanConfig::default();
        cfg.server.port = 0;
        cfg.annotation.jpeg_quality = 0;
        cfg.annotation.stroke_width = 0;
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["server.port", "annotation.jpegQuality", "annotation.strokeWidth"]
        );
    }

    #[test]
    fn origin_entries_are_checked() {
        let mut cfg = LabelScanConfig::default();
        cfg.cors.allowed_origins = vec![
            "http://localhost:3000".into(),
            " ".into(),
            "*".into(),
            "http://bad\norigin".into(),
            "localhost:3000".into(),
        ];
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "cors.allowedOrigins[1]",
                "cors.allowedOrigins[2]",
                "cors.allowedOrigins[3]",
                "cors.allowedOrigins[4]"
            ]
        );
    }

    #[test]
    fn empty_origin_list_is_only_a_warning() {
        let mut cfg = LabelScanConfig::default();
        cfg.cors.allowed_origins.clear();
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "cors.allowedOrigins"));
    }

    #[test]
    fn blank_extra_labels_are_errors() {
        let mut cfg = LabelScanConfig::default();
        cfg.extraction.extra_labels.manufacturing_date = vec!["Prod Date".into(), "".into()];
        cfg.extraction.extra_labels.company_name = vec!["  ".into()];
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "extraction.extraLabels.manufacturingDate[1]",
                "extraction.extraLabels.companyName[0]"
            ]
        );
    }
}
