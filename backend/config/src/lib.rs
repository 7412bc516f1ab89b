//! Runtime configuration for the label scanner.
//!
//! Provides:
//! - Typed config schema (server, CORS, OCR models, normalization, annotation, extraction, logging)
//! - YAML loading with config file discovery
//! - `${ENV_VAR}` substitution and `LABELSCAN_*` overrides
//! - Path-dependent defaults
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_raw_config, resolve_config_path};
pub use schema::{
    AnnotationConfig, CorsConfig, ExtraLabels, ExtractionConfig, LabelScanConfig, LoggingConfig,
    NormalizeConfig, OcrConfig, ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// A validated config plus the warnings found while validating it.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: LabelScanConfig,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    /// Emit each warning. Call once a subscriber is installed.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Any
/// validation error aborts the load; warnings are handed back so the caller
/// can log them after the logger is up.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let raw = load_raw_config(path).await?;

    let value = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;
    let config: LabelScanConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config, &config_dir());

    let warnings = check(&config)?;
    Ok(PreparedConfig { config, warnings })
}

/// Fail if the config holds errors, otherwise return its warnings.
pub fn check(config: &LabelScanConfig) -> Result<Vec<ConfigValidationError>> {
    let report = validate(config);
    if !report.is_valid() {
        let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n  {}", details.join("\n  "));
    }
    Ok(report.warnings)
}
