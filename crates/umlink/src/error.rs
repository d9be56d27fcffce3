//! CLI error types.

use umlink_config::ConfigError;
use umlink_diagrams::{DecodeError, EncodeError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Encode(#[from] EncodeError),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Validation(String),
}
