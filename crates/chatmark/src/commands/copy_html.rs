//! `chatmark copy-html` command implementation.

use std::path::PathBuf;

use chatmark_renderer::render_for_clipboard;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the copy-html command.
#[derive(Args)]
pub(crate) struct CopyHtmlArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CopyHtmlArgs {
    /// Execute the copy-html command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = std::fs::read_to_string(&self.markdown_file)?;
        tracing::info!(path = %self.markdown_file.display(), "Rendering clipboard HTML");
        Output::new().html(&render_for_clipboard(&markdown))?;
        Ok(())
    }
}
