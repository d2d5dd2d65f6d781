//! chatmark CLI - Streaming chat markdown renderer.
//!
//! Provides commands for:
//! - `render`: Render a markdown file as a finished chat message
//! - `replay`: Stream a markdown file through the incremental renderer
//! - `copy-html`: Render a markdown file as clipboard HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CopyHtmlArgs, RenderArgs, ReplayArgs};
use output::Output;

/// chatmark - Streaming chat markdown renderer.
#[derive(Parser)]
#[command(name = "chatmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file with the final renderer.
    Render(RenderArgs),
    /// Replay a markdown file as a chunked stream.
    Replay(ReplayArgs),
    /// Render a markdown file as plain HTML for the clipboard.
    CopyHtml(CopyHtmlArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.settings.verbose,
            Self::Replay(args) => args.settings.verbose,
            Self::CopyHtml(args) => args.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Replay(args) => args.execute(),
        Commands::CopyHtml(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
