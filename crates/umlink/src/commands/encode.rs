//! `umlink encode` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use umlink_config::{CliSettings, Config};
use umlink_diagrams::{DiagramLanguage, RenderRequest, encode, prepare_source};

use super::diagram_settings;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the encode command.
#[derive(Args)]
pub(crate) struct EncodeArgs {
    /// Diagram source file (default: read from stdin).
    input: Option<PathBuf>,

    /// Diagram language: plantuml, ditaa or graphviz.
    #[arg(short = 't', long = "type", default_value = "plantuml", value_parser = parse_language)]
    language: DiagramLanguage,

    /// PlantUML server URL; prints the full image URL instead of the payload.
    #[arg(long, env = "PLANTUML_SERVER_URL")]
    server_url: Option<String>,

    /// Image format for the URL: png or svg (overrides config).
    #[arg(long)]
    format: Option<String>,

    /// Path to configuration file (default: auto-discover umlink.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl EncodeArgs {
    /// Execute the encode command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the source cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            server_url: self.server_url,
            default_format: self.format,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let settings = diagram_settings(&config.diagrams_resolved)?;

        let source = read_source(self.input.as_deref())?;
        let prepared = prepare_source(
            &source,
            self.language,
            config.diagrams_resolved.config_content.as_deref(),
        );
        let payload = encode(&prepared)?;

        let line = match settings.get_server_url() {
            Some(url) => RenderRequest::new(url, settings.get_default_format(), payload).url(),
            None => payload,
        };
        output.result(&line)?;
        Ok(())
    }
}

/// Parse a `--type` value.
fn parse_language(value: &str) -> Result<DiagramLanguage, String> {
    DiagramLanguage::parse(value).ok_or_else(|| {
        format!("unknown diagram type '{value}' (expected plantuml, ditaa or graphviz)")
    })
}

/// Read diagram source from a file, or stdin for None or `-`.
///
/// Trailing line breaks are dropped, as they are for block content.
fn read_source(input: Option<&Path>) -> Result<String, CliError> {
    let mut source = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let trimmed = source.trim_end_matches(['\n', '\r']).len();
    source.truncate(trimmed);
    Ok(source)
}
