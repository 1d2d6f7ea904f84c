use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::DocumentFormat;
use crate::form::FormSnapshot;

/// Where a saved snapshot is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    /// `-` is stdout, anything else a file path.
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            OutputDestination::Stdout
        } else {
            OutputDestination::File(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destination: OutputDestination,
}

impl OutputOptions {
    /// Options for `destination`; files take their format from the extension.
    pub fn for_destination(destination: OutputDestination) -> Result<Self> {
        let format = match &destination {
            OutputDestination::Stdout => DocumentFormat::default(),
            OutputDestination::File(path) => DocumentFormat::from_extension(path)
                .with_context(|| {
                    format!(
                        "cannot tell the snapshot format of {}; use one of: {}",
                        path.display(),
                        supported_list()
                    )
                })?,
        };
        Ok(Self {
            format,
            pretty: true,
            destination,
        })
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Serialize `snapshot` in its wire shape.
pub fn render_snapshot(
    snapshot: &FormSnapshot,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String> {
    let rendered = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(snapshot)?,
        DocumentFormat::Json => serde_json::to_string(snapshot)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(snapshot)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(snapshot)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(snapshot)?,
    };
    Ok(rendered)
}

/// Render `snapshot` and write it to the configured destination.
pub fn emit_snapshot(snapshot: &FormSnapshot, options: &OutputOptions) -> Result<()> {
    let rendered = render_snapshot(snapshot, options.format, options.pretty)
        .with_context(|| format!("failed to encode snapshot as {}", options.format))?;
    match &options.destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}")
                .and_then(|_| stdout.flush())
                .context("failed to write snapshot to stdout")
        }
        OutputDestination::File(path) => fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("failed to write snapshot to {}", path.display())),
    }
}

fn supported_list() -> String {
    DocumentFormat::available_formats()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
