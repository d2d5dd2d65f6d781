//! Code block processor trait for extensible code block handling.
//!
//! Processors are registered with the renderer and checked in order when a
//! fenced code block with a language is encountered. The first processor
//! returning a non-`PassThrough` result wins; blocks nobody claims are
//! rendered by the backend as escaped code.
//!
//! # Example
//!
//! ```
//! use chatmark_renderer::{CodeBlockProcessor, ProcessResult};
//!
//! struct Shout;
//!
//! impl CodeBlockProcessor for Shout {
//!     fn process(&mut self, language: &str, source: &str, _index: usize) -> ProcessResult {
//!         if language == "shout" {
//!             ProcessResult::Inline(format!("<p>{}</p>", source.trim().to_uppercase()))
//!         } else {
//!             ProcessResult::PassThrough
//!         }
//!     }
//! }
//! ```

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with placeholder markup that an external
    /// component resolves after the HTML is mounted.
    Placeholder(String),

    /// Replace the code block with finished HTML.
    Inline(String),

    /// Render as a regular code block.
    PassThrough,
}

/// A code block that was replaced by a placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedCodeBlock {
    /// Zero-based index of this code block in the document.
    pub index: usize,
    /// Language identifier from the fence (e.g., "chart").
    pub language: String,
    /// Identifier carried by the placeholder element.
    pub id: String,
}

/// Trait for processing special code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block and return the result.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index of the block in the document
    fn process(&mut self, language: &str, source: &str, index: usize) -> ProcessResult;

    /// Blocks replaced with placeholders during rendering.
    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &[]
    }

    /// Warnings generated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Language of a fence info string: its first word, if any.
#[must_use]
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language_first_word() {
        assert_eq!(fence_language("rust"), Some("rust".to_owned()));
        assert_eq!(fence_language("python title=x"), Some("python".to_owned()));
    }

    #[test]
    fn test_fence_language_empty() {
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
    }

    #[test]
    fn test_default_trait_implementations() {
        struct MinimalProcessor;

        impl CodeBlockProcessor for MinimalProcessor {
            fn process(&mut self, _language: &str, _source: &str, _index: usize) -> ProcessResult {
                ProcessResult::PassThrough
            }
        }

        let mut processor = MinimalProcessor;
        assert_eq!(processor.process("rust", "", 0), ProcessResult::PassThrough);
        assert!(processor.extracted().is_empty());
        assert!(processor.warnings().is_empty());
    }
}
