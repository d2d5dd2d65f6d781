//! `chatmark render` command implementation.

use std::path::PathBuf;

use chatmark_config::CliSettings;
use clap::Args;

use super::settings::{SettingsArgs, renderers};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load_config(CliSettings::default())?;
        let markdown = std::fs::read_to_string(&self.markdown_file)?;

        let result = renderers(&config).full.render(&markdown);
        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        for block in &result.extracted {
            tracing::info!(language = %block.language, id = %block.id, "Extracted code block");
        }

        output.html(&result.html)?;
        Ok(())
    }
}
