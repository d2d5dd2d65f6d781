//! Chart placeholders for ```` ```chart ```` fences.
//!
//! The fence body is the identifier of a chart created through the chart
//! tool. The renderer only emits a loading placeholder keyed by that id; the
//! chart component swaps in the canvas once the element is mounted.

use std::fmt::Write;

use crate::code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
use crate::escape::escape_html;

/// Fence language that produces a chart placeholder.
pub const CHART_LANGUAGE: &str = "chart";

/// Emits chart placeholders and records their identifiers.
#[derive(Debug, Default)]
pub struct ChartProcessor {
    extracted: Vec<ExtractedCodeBlock>,
}

impl ChartProcessor {
    /// Create a new chart processor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for ChartProcessor {
    fn process(&mut self, language: &str, source: &str, index: usize) -> ProcessResult {
        if language != CHART_LANGUAGE {
            return ProcessResult::PassThrough;
        }

        let id = source.trim();
        self.extracted.push(ExtractedCodeBlock {
            index,
            language: language.to_owned(),
            id: id.to_owned(),
        });
        ProcessResult::Placeholder(chart_placeholder(id))
    }

    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &self.extracted
    }
}

/// Loading placeholder markup for the chart `id`.
#[must_use]
pub fn chart_placeholder(id: &str) -> String {
    let mut out = format!(
        r#"<div class="chart-loading" data-id="{}">"#,
        escape_html(id)
    );
    for bar in 1..=5 {
        write!(out, r#"<div class="bar{bar}"><div></div></div>"#).unwrap();
    }
    out.push_str("<span>Loading chart…</span></div>");
    out
}
