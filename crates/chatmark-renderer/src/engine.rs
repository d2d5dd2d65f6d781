//! Full and Fast rendering engines.
//!
//! An engine is an immutable bundle of rendering options. Each call to
//! [`MarkdownEngine::render`] builds a fresh [`MarkdownRenderer`] so engines
//! can be shared between streams behind an [`Arc`].

use std::fmt;
use std::sync::Arc;

use crate::chart::ChartProcessor;
use crate::highlight::{HighlightProcessor, Highlighter};
use crate::html::{ChatBackend, ClipboardBackend};
use crate::renderer::{MarkdownRenderer, RenderResult};

/// Which flavour of output an engine produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Finished output: highlighted code, math and chart placeholders.
    Full,
    /// Lenient output for the volatile tail: escaped code, charts as code,
    /// math as plain text.
    Fast,
}

/// Immutable markdown-to-HTML engine.
#[derive(Clone)]
pub struct MarkdownEngine {
    mode: RenderMode,
    gfm: bool,
    highlighter: Option<Arc<dyn Highlighter>>,
}

impl MarkdownEngine {
    /// Engine for committed content.
    ///
    /// Without a highlighter code blocks are escaped like in Fast mode.
    #[must_use]
    pub fn full(highlighter: Option<Arc<dyn Highlighter>>) -> Self {
        Self {
            mode: RenderMode::Full,
            gfm: true,
            highlighter,
        }
    }

    /// Engine for the unstable tail of a stream.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            mode: RenderMode::Fast,
            gfm: true,
            highlighter: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Render `markdown` and return HTML with the extracted chart ids.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        self.create_renderer().render_markdown(markdown)
    }

    /// Render `markdown` to an HTML string.
    #[must_use]
    pub fn render_html(&self, markdown: &str) -> String {
        self.render(markdown).html
    }

    fn create_renderer(&self) -> MarkdownRenderer<ChatBackend> {
        let mut renderer = MarkdownRenderer::<ChatBackend>::new().with_gfm(self.gfm);

        if self.mode == RenderMode::Full {
            renderer = renderer
                .with_math(true)
                .with_processor(ChartProcessor::new());
            if let Some(highlighter) = &self.highlighter {
                renderer = renderer.with_processor(HighlightProcessor::new(Arc::clone(highlighter)));
            }
        }

        renderer
    }
}

impl fmt::Debug for MarkdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownEngine")
            .field("mode", &self.mode)
            .field("gfm", &self.gfm)
            .field("highlight", &self.highlighter.is_some())
            .finish()
    }
}

/// The engine pair a stream session renders with.
#[derive(Clone, Debug)]
pub struct Renderers {
    /// Renders committed (stable) content.
    pub full: MarkdownEngine,
    /// Renders the unstable tail and drives boundary detection.
    pub fast: MarkdownEngine,
}

impl Renderers {
    /// Build both engines with shared options.
    #[must_use]
    pub fn new(gfm: bool, highlighter: Option<Arc<dyn Highlighter>>) -> Self {
        Self {
            full: MarkdownEngine::full(highlighter).with_gfm(gfm),
            fast: MarkdownEngine::fast().with_gfm(gfm),
        }
    }
}

impl Default for Renderers {
    fn default() -> Self {
        Self::new(true, None)
    }
}

/// Render `markdown` as plain semantic HTML for the clipboard.
#[must_use]
pub fn render_for_clipboard(markdown: &str) -> String {
    MarkdownRenderer::<ClipboardBackend>::new()
        .render_markdown(markdown)
        .html
}
