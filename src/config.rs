use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::data::format::extension_of;
use crate::error::{FileRole, Result, SieveError};

/// Threshold used when the config does not name one.
pub const DEFAULT_THRESHOLD: i64 = 10;

/// How a non-integer `threshold` entry is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Reject the config with `InvalidThreshold`.
    #[default]
    Strict,
    /// Coerce where possible, otherwise fall back to the default with a warning.
    Lenient,
}

/// A validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub threshold: i64,
}

/// Read and validate a YAML (`.yaml`/`.yml`) or JSON (`.json`) config file.
///
/// ```yaml
/// input: data/in.csv
/// output: data/out.csv
/// threshold: 10   # optional
/// ```
pub fn load_config(path: &Path, policy: ThresholdPolicy) -> Result<Config> {
    if !path.exists() {
        return Err(SieveError::NotFound {
            role: FileRole::Config,
            path: path.to_path_buf(),
        });
    }

    let ext = extension_of(path);
    let text = std::fs::read_to_string(path).map_err(|e| SieveError::io(path, e))?;
    let doc: Value = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str::<Value>(&text).map_err(|e| parse_error(path, e))?,
        "json" => serde_json::from_str::<Value>(&text).map_err(|e| parse_error(path, e))?,
        _ => {
            return Err(SieveError::UnsupportedFormat {
                role: FileRole::Config,
                extension: ext,
                path: path.to_path_buf(),
            })
        }
    };

    let Value::Object(map) = doc else {
        return Err(parse_error(path, "top level must be a mapping"));
    };

    let input_path = required_path(&map, "input", path)?;
    let output_path = required_path(&map, "output", path)?;
    let threshold = match map.get("threshold") {
        None => DEFAULT_THRESHOLD,
        Some(raw) => threshold_from(raw, policy, path)?,
    };

    log::debug!(
        "Config {}: input={}, output={}, threshold={threshold}",
        path.display(),
        input_path.display(),
        output_path.display()
    );
    Ok(Config {
        input_path,
        output_path,
        threshold,
    })
}

fn required_path(map: &Map<String, Value>, field: &'static str, path: &Path) -> Result<PathBuf> {
    match map.get(field) {
        None => Err(SieveError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
        Some(Value::String(s)) => Ok(PathBuf::from(s)),
        Some(other) => Err(parse_error(
            path,
            format!("'{field}' must be a string, got {other}"),
        )),
    }
}

fn threshold_from(raw: &Value, policy: ThresholdPolicy, path: &Path) -> Result<i64> {
    if let Some(t) = raw.as_i64() {
        return Ok(t);
    }
    match policy {
        ThresholdPolicy::Strict => Err(SieveError::InvalidThreshold {
            path: path.to_path_buf(),
            value: raw.to_string(),
        }),
        ThresholdPolicy::Lenient => Ok(coerce_threshold(raw).unwrap_or_else(|| {
            log::warn!(
                "Config {}: threshold {raw} is not an integer, using default {DEFAULT_THRESHOLD}",
                path.display()
            );
            DEFAULT_THRESHOLD
        })),
    }
}

fn coerce_threshold(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_error(path: &Path, reason: impl ToString) -> SieveError {
    SieveError::ConfigParse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
