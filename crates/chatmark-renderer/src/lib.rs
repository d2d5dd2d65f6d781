//! Trait-based markdown renderer for chat messages.
//!
//! This crate provides a generic [`MarkdownRenderer`] that produces HTML
//! through the [`RenderBackend`] trait, and the two engines a streaming
//! view renders with:
//! - [`MarkdownEngine::full`]: committed content, with syntax highlighting
//!   and chart placeholders
//! - [`MarkdownEngine::fast`]: the volatile tail of a stream, escaped code only
//!
//! Both engines share one grammar (`CommonMark` plus GFM tables,
//! strikethrough and task lists) and one code block markup, so a prefix
//! rendered by either produces the same structure.
//!
//! # Example
//!
//! ```
//! use chatmark_renderer::Renderers;
//!
//! let renderers = Renderers::default();
//! let html = renderers.full.render_html("# Hello\n\n**Bold** text");
//! assert_eq!(html, "<h1>Hello</h1><p><strong>Bold</strong> text</p>");
//! ```

mod backend;
mod chart;
mod code_block;
mod download;
mod engine;
mod escape;
mod highlight;
mod html;
mod renderer;
mod state;

pub use backend::RenderBackend;
pub use chart::{CHART_LANGUAGE, ChartProcessor, chart_placeholder};
pub use code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
pub use download::{download_extension, download_file_name};
pub use engine::{MarkdownEngine, RenderMode, Renderers, render_for_clipboard};
pub use escape::{escape_html, unescape_html};
pub use highlight::{HighlightProcessor, Highlighter, SyntectHighlighter};
pub use html::{ChatBackend, ClipboardBackend, write_code_block};
pub use renderer::{MarkdownRenderer, RenderResult};
