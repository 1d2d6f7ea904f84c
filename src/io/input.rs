use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::DocumentFormat;
use crate::{
    domain::{FormLayout, parse_form_layout},
    form::FormSnapshot,
};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse `contents` trying `preferred` first, then every other compiled-in format.
///
/// The error reports why the preferred (or first) format failed.
pub fn parse_document_any(contents: &str, preferred: Option<DocumentFormat>) -> Result<Value> {
    let mut formats = DocumentFormat::available_formats();
    if let Some(format) = preferred {
        formats.retain(|candidate| *candidate != format);
        formats.insert(0, format);
    }
    let mut first_error = None;
    for format in formats {
        match parse_document_str(contents, format) {
            Ok(value) => return Ok(value),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    Err(first_error.unwrap_or_else(|| anyhow!("no document format compiled in")))
}

pub fn load_layout(contents: &str, format: DocumentFormat) -> Result<FormLayout> {
    let value = parse_document_str(contents, format)?;
    parse_form_layout(&value).context("invalid form layout")
}

pub fn parse_snapshot(contents: &str, format: DocumentFormat) -> Result<FormSnapshot> {
    let value = parse_document_str(contents, format)?;
    snapshot_from_value(value)
}

pub fn snapshot_from_value(value: Value) -> Result<FormSnapshot> {
    serde_json::from_value(value).context("invalid form snapshot")
}
