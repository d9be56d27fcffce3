//! `umlink decode` command implementation.

use clap::Args;
use umlink_diagrams::decode;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the decode command.
#[derive(Args)]
pub(crate) struct DecodeArgs {
    /// Encoded payload, or a full image URL ending in one.
    payload: String,
}

impl DecodeArgs {
    /// Execute the decode command.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid PlantUML encoding.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let source = decode(payload_segment(&self.payload))?;
        Output::new().result(&source)?;
        Ok(())
    }
}

/// Payload part of an image URL (`.../png/<payload>`), or the input itself.
fn payload_segment(input: &str) -> &str {
    let input = input.trim().trim_end_matches('/');
    input.rsplit('/').next().unwrap_or(input)
}
