//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod decode;
pub(crate) mod encode;

pub(crate) use convert::ConvertArgs;
pub(crate) use decode::DecodeArgs;
pub(crate) use encode::EncodeArgs;

use umlink_config::DiagramsConfig;
use umlink_diagrams::{DiagramFormat, DiagramSettings};

use crate::error::CliError;

/// Process-level diagram defaults from resolved configuration.
pub(crate) fn diagram_settings(config: &DiagramsConfig) -> Result<DiagramSettings, CliError> {
    let format = DiagramFormat::parse(&config.default_format).ok_or_else(|| {
        CliError::Validation(format!(
            "unsupported default format '{}' (expected png or svg)",
            config.default_format
        ))
    })?;

    let mut settings = DiagramSettings::new().default_format(format);
    if let Some(url) = &config.server_url {
        settings = settings.server_url(url.as_str());
    }
    if let Some(content) = &config.config_content {
        settings = settings.plantuml_config(content.as_str());
    }
    Ok(settings)
}

/// Parse a `name=value` document attribute argument.
///
/// A bare `name` sets the attribute to an empty value.
pub(crate) fn parse_attribute(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg.split_once('=').unwrap_or((arg, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid attribute '{arg}': expected NAME=VALUE"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
