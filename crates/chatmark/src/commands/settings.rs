//! Options shared by the rendering commands.

use std::path::PathBuf;
use std::sync::Arc;

use chatmark_config::{CliSettings, Config};
use chatmark_renderer::{Highlighter, Renderers, SyntectHighlighter};
use clap::Args;

use crate::error::CliError;

/// Configuration and renderer options.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// Path to configuration file (default: auto-discover chatmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable tables, strikethrough, task lists and footnotes.
    #[arg(long)]
    no_gfm: bool,

    /// Disable syntax highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Enable verbose output (per-render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SettingsArgs {
    /// Load configuration with these flags and `extra` applied.
    pub(crate) fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            highlight: self.no_highlight.then_some(false),
            ..extra
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Engine pair for `config`.
pub(crate) fn renderers(config: &Config) -> Renderers {
    let highlighter = config
        .render
        .highlight
        .then(|| Arc::new(SyntectHighlighter::new()) as Arc<dyn Highlighter>);
    Renderers::new(config.render.gfm, highlighter)
}
