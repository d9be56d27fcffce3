//! `umlink convert` command implementation.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Args;
use umlink_config::{CliSettings, Config};
use umlink_diagrams::register_with;
use umlink_renderer::{DocumentAttributes, DocumentRenderer, ExtensionRegistry, escape_html};

use super::{diagram_settings, parse_attribute};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// AsciiDoc file to convert.
    input: PathBuf,

    /// Output HTML file (default: input with `.html` extension, `-` for stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PlantUML server URL (overrides config).
    #[arg(long, env = "PLANTUML_SERVER_URL")]
    server_url: Option<String>,

    /// Default image format: png or svg (overrides config).
    #[arg(long)]
    format: Option<String>,

    /// Document attribute as NAME=VALUE (repeatable).
    #[arg(short = 'a', long = "attribute", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Wrap the output in a complete HTML page.
    #[arg(short, long)]
    standalone: bool,

    /// Path to configuration file (default: auto-discover umlink.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input cannot be read or
    /// the output cannot be written. Diagram problems are reported as warnings.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            server_url: self.server_url,
            default_format: self.format,
            attributes: self.attributes,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        if !has_server_url(&config) {
            output.warning(
                "No PlantUML server configured; diagram blocks need a plantuml-server-url attribute",
            );
        }

        let mut registry = ExtensionRegistry::new();
        register_with(&mut registry, diagram_settings(&config.diagrams_resolved)?);
        let attributes: DocumentAttributes = config.attributes.iter().collect();
        let renderer = DocumentRenderer::new(registry).with_attributes(attributes);

        let input = std::fs::read_to_string(&self.input)?;
        let result = renderer.render(&input);
        tracing::info!(
            input = %self.input.display(),
            warnings = result.warnings.len(),
            "Converted document"
        );

        for warning in &result.warnings {
            output.warning(&format!("{}: {warning}", self.input.display()));
        }

        let html = if self.standalone {
            standalone_page(result.title.as_deref(), &result.html)
        } else {
            result.html
        };

        match output_path(&self.input, self.output.as_deref()) {
            None => output.result(html.trim_end())?,
            Some(path) => {
                std::fs::write(&path, html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
        }

        Ok(())
    }
}

/// Whether a server comes from the diagrams section or a predefined
/// `plantuml-server-url` document attribute.
fn has_server_url(config: &Config) -> bool {
    config.diagrams_resolved.server_url.is_some()
        || config
            .attributes
            .get("plantuml-server-url")
            .is_some_and(|url| !url.trim().is_empty())
}

/// Output file for `input`, or None for stdout.
fn output_path(input: &Path, output: Option<&Path>) -> Option<PathBuf> {
    match output {
        Some(path) if path == Path::new("-") => None,
        Some(path) => Some(path.to_path_buf()),
        None => Some(input.with_extension("html")),
    }
}

/// Minimal HTML page around a rendered body fragment.
fn standalone_page(title: Option<&str>, body: &str) -> String {
    let mut page = String::with_capacity(body.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    if let Some(title) = title {
        writeln!(page, "<title>{}</title>", escape_html(title)).unwrap();
    }
    page.push_str("</head>\n<body>\n");
    if let Some(title) = title {
        writeln!(page, "<h1>{}</h1>", escape_html(title)).unwrap();
    }
    page.push_str(body);
    page.push_str("</body>\n</html>\n");
    page
}
