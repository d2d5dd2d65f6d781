//! Syntax highlighting for stable code blocks.

use std::fmt;
use std::sync::Arc;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::html::write_code_block;

/// Maps `(code, language)` to a highlighted HTML fragment.
///
/// Implementations return `None` for languages they do not know; the block is
/// then rendered as escaped plain text.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `language`.
    fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

/// Class prefix matching the highlight.js stylesheets used by the chat view.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Class-based highlighter backed by syntect's bundled grammars.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    /// Load the default syntax definitions.
    ///
    /// Loading takes a noticeable fraction of a second; build one instance
    /// and share it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyntectHighlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntectHighlighter")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(language)?;
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!(language, error = %e, "Highlighting failed, falling back to plain text");
                return None;
            }
        }
        Some(generator.finalize())
    }
}

/// Code block processor that highlights known languages.
pub struct HighlightProcessor {
    highlighter: Arc<dyn Highlighter>,
}

impl HighlightProcessor {
    /// Create a processor using `highlighter`.
    #[must_use]
    pub fn new(highlighter: Arc<dyn Highlighter>) -> Self {
        Self { highlighter }
    }
}

impl CodeBlockProcessor for HighlightProcessor {
    fn process(&mut self, language: &str, source: &str, _index: usize) -> ProcessResult {
        match self.highlighter.highlight(source, language) {
            Some(body) => {
                let mut out = String::with_capacity(body.len() + 256);
                write_code_block(Some(language), &body, &mut out);
                ProcessResult::Inline(out)
            }
            None => ProcessResult::PassThrough,
        }
    }
}
