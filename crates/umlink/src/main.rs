//! umlink CLI - AsciiDoc diagram blocks as PlantUML server images.
//!
//! Provides commands for:
//! - `convert`: Render an AsciiDoc document to HTML
//! - `encode`: Encode a diagram source into a PlantUML payload or URL
//! - `decode`: Decode a PlantUML payload back into diagram source

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, DecodeArgs, EncodeArgs};
use output::Output;

/// umlink - AsciiDoc diagram blocks as PlantUML server images.
#[derive(Parser)]
#[command(name = "umlink", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an AsciiDoc document to HTML.
    Convert(ConvertArgs),
    /// Encode diagram source into a PlantUML payload.
    Encode(EncodeArgs),
    /// Decode a PlantUML payload into diagram source.
    Decode(DecodeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Encode(args) => args.execute(),
        Commands::Decode(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
