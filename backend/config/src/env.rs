//! Environment handling for config values.
//!
//! `${VAR_NAME}` references in string values are resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are matched and `$${VAR}` escapes
//! to a literal `${VAR}`. After the file is typed, a few `LABELSCAN_*`
//! variables override individual keys.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::LabelScanConfig;

/// A reference, optionally preceded by the `$` escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const BIND_ENV: &str = "LABELSCAN_BIND";
pub const PORT_ENV: &str = "LABELSCAN_PORT";
pub const LOG_LEVEL_ENV: &str = "LABELSCAN_LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value, MissingEnvVarError> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute using a provided map.
pub fn resolve_env_vars_with(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    substitute_value(value, env, "")
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<String> = None;
    let replaced = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(MissingEnvVarError {
            var_name,
            config_path: path.to_string(),
        }),
        None => Ok(replaced.into_owned()),
    }
}

/// Apply `LABELSCAN_BIND`, `LABELSCAN_PORT` and `LABELSCAN_LOG_LEVEL`.
pub fn apply_env_overrides(config: LabelScanConfig) -> Result<LabelScanConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

pub fn apply_env_overrides_with(
    mut config: LabelScanConfig,
    env: &HashMap<String, String>,
) -> Result<LabelScanConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get(BIND_ENV) {
        config.server.bind_address = bind.to_string();
    }
    if let Some(port) = get(PORT_ENV) {
        config.server.port = port
            .parse()
            .with_context(|| format!("{PORT_ENV} is not a valid port: {port}"))?;
    }
    if let Some(level) = get(LOG_LEVEL_ENV) {
        config.logging.level = level.to_string();
    }
    Ok(config)
}
