//! Serialization helpers for CLI output.

use clap::ValueEnum;
use serde::Serialize;
use systemd_nri_common::error::Result;

/// Output encoding selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Encodes `value` in the requested format, without a trailing newline.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn render<T: Serialize>(value: &T, format: Format) -> Result<String> {
    let text = match format {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(text.trim_end().to_string())
}
