//! Error types for diagram blocks.

use std::io;
use std::string::FromUtf8Error;

/// Compressing a diagram source failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to compress diagram source: {0}")]
pub struct EncodeError(#[from] io::Error);

/// A payload could not be turned back into diagram source.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid payload: {0}")]
    Payload(#[from] base64::DecodeError),

    #[error("invalid compressed data: {0}")]
    Inflate(#[from] io::Error),

    #[error("decoded source is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Reasons a diagram block is rendered as source instead of an image.
///
/// The block processor never propagates these: the block is replaced with an
/// error block and a warning is recorded.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("unsupported format '{0}' (expected png or svg)")]
    UnsupportedFormat(String),

    #[error(
        "no PlantUML server URL: set the plantuml-server-url attribute or configure a default server"
    )]
    ServerUrlMissing,

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
