//! Generic markdown renderer with pluggable backend.

use std::fmt::Write;
use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::backend::RenderBackend;
use crate::code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult, fence_language};
use crate::escape::escape_html;
use crate::state::{CodeBlockState, ImageState, TableState};

/// Result of rendering markdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML. Block elements are concatenated without separators.
    pub html: String,
    /// Code blocks replaced with placeholders (e.g. chart ids to resolve).
    pub extracted: Vec<ExtractedCodeBlock>,
    /// Warnings reported by processors.
    pub warnings: Vec<String>,
}

/// Generic markdown renderer with pluggable backend.
///
/// A renderer instance holds per-document state and is meant to be used for
/// a single [`render`](Self::render) call. Shared configuration lives in
/// [`MarkdownEngine`](crate::MarkdownEngine), which builds a fresh renderer
/// per document.
///
/// # Code Block Processors
///
/// Custom code block processing can be added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning a non-`PassThrough` result wins.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    code_block_index: usize,
    html_block: Option<String>,
    gfm: bool,
    math: bool,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            processors: Vec::new(),
            code_block_index: 0,
            html_block: None,
            gfm: true,
            math: false,
            _backend: PhantomData,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable `$inline$` and `$$display$$` math.
    ///
    /// Math is emitted as `span.math` elements holding the escaped TeX source,
    /// typeset by the client.
    #[must_use]
    pub fn with_math(mut self, enabled: bool) -> Self {
        self.math = enabled;
        self
    }

    /// Add a code block processor.
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        options
    }

    /// Render markdown text using the configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, self.parser_options());
        self.render(parser)
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            extracted: self
                .processors
                .iter()
                .flat_map(|p| p.extracted())
                .cloned()
                .collect(),
            warnings: self
                .processors
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.raw_html(&html),
            // Raw markup from the model is shown, never interpreted.
            Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => B::hard_break(&mut self.output),
            Event::Rule => B::horizontal_rule(&mut self.output),
            Event::TaskListMarker(checked) => B::task_list_marker(checked, &mut self.output),
            Event::InlineMath(tex) => self.math(&tex, "inline"),
            Event::DisplayMath(tex) => self.math(&tex, "display"),
            Event::FootnoteReference(_) => {
                // Not supported
            }
        }
    }

    /// Push inline markup unless alt text is being collected.
    fn push_inline(&mut self, markup: &str) {
        if !self.image.is_active() {
            self.output.push_str(markup);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                write!(self.output, "<h{}>", heading_level_to_num(level)).unwrap();
            }
            Tag::BlockQuote(_) => B::blockquote_start(&mut self.output),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => fence_language(info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                write!(self.output, "<{}{align}>", self.table.cell_tag()).unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    write!(link, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text arrives as nested events; the tag is written at the end.
                self.image.start(dest_url.to_string(), title.to_string());
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                write!(self.output, "</h{}>", heading_level_to_num(level)).unwrap();
            }
            TagEnd::BlockQuote(_) => B::blockquote_end(&mut self.output),
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::HtmlBlock => {
                if let Some(raw) = self.html_block.take() {
                    write!(self.output, "<p>{}</p>", escape_html(raw.trim_end())).unwrap();
                }
            }
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    B::image(&src, &alt, &title, &mut self.output);
                }
            }
        }
    }

    fn end_code_block(&mut self) {
        let (lang, content) = self.code.end();
        let index = self.code_block_index;
        self.code_block_index += 1;

        // Try processors in order, fall back to the backend's plain rendering
        let processed = lang.as_deref().is_some_and(|lang| {
            self.processors.iter_mut().any(|processor| {
                match processor.process(lang, &content, index) {
                    ProcessResult::Placeholder(html) | ProcessResult::Inline(html) => {
                        self.output.push_str(&html);
                        true
                    }
                    ProcessResult::PassThrough => false,
                }
            })
        });

        if !processed {
            B::code_block(lang.as_deref(), &content, &mut self.output);
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    /// Collect an HTML block; it is rendered as an escaped paragraph.
    fn raw_html(&mut self, html: &str) {
        match &mut self.html_block {
            Some(raw) => raw.push_str(html),
            None => self.text(html),
        }
    }

    fn math(&mut self, tex: &str, display: &str) {
        if self.image.is_active() {
            self.image.push_str(tex);
        } else {
            write!(
                self.output,
                r#"<span class="math {display}">{}</span>"#,
                escape_html(tex)
            )
            .unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.output.push('\n');
        }
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{ChatBackend, ClipboardBackend};
    use crate::{ChartProcessor, ProcessResult};
    use pretty_assertions::assert_eq;

    fn render_html(markdown: &str) -> String {
        MarkdownRenderer::<ChatBackend>::new()
            .render_markdown(markdown)
            .html
    }

    #[test]
    fn test_paragraph_and_heading() {
        assert_eq!(
            render_html("# Title\n\nSome text."),
            "<h1>Title</h1><p>Some text.</p>"
        );
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            render_html("Hello **world** and *you* ~~not~~ `code`"),
            "<p>Hello <strong>world</strong> and <em>you</em> <s>not</s> <code>code</code></p>"
        );
    }

    #[test]
    fn test_unterminated_emphasis_stays_literal() {
        assert_eq!(render_html("Hello **wor"), "<p>Hello **wor</p>");
    }

    #[test]
    fn test_soft_break_kept_as_newline() {
        assert_eq!(render_html("a\nb"), "<p>a\nb</p>");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(render_html("a  \nb"), "<p>a<br>b</p>");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render_html("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(render_html("3. x\n4. y"), r#"<ol start="3"><li>x</li><li>y</li></ol>"#);
        assert_eq!(render_html("1. x"), "<ol><li>x</li></ol>");
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            render_html("- [x] done\n- [ ] todo"),
            r#"<ul><li><input type="checkbox" checked disabled> done</li><li><input type="checkbox" disabled> todo</li></ul>"#
        );
    }

    #[test]
    fn test_table() {
        let html = render_html("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            concat!(
                r#"<table><thead><tr><th style="text-align:left">a</th><th style="text-align:right">b</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align:left">1</td><td style="text-align:right">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            render_html(r#"[site](https://x.test "T") ![an *alt*](i.png)"#),
            r#"<p><a href="https://x.test" title="T">site</a> <img src="i.png" alt="an alt"></p>"#
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render_html("> quoted"), "<blockquote><p>quoted</p></blockquote>");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(render_html("a\n\n---\n\nb"), "<p>a</p><hr><p>b</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render_html("1 < 2 & \"x\""), "<p>1 &lt; 2 &amp; &quot;x&quot;</p>");
    }

    #[test]
    fn test_inline_html_is_escaped() {
        assert_eq!(
            render_html("Use Vec<T> here <img src=x onerror=alert(1)>"),
            "<p>Use Vec&lt;T&gt; here &lt;img src=x onerror=alert(1)&gt;</p>"
        );
    }

    #[test]
    fn test_html_block_is_escaped_paragraph() {
        assert_eq!(
            render_html("<script>alert(2)</script>\n\nend"),
            "<p>&lt;script&gt;alert(2)&lt;/script&gt;</p><p>end</p>"
        );
        assert_eq!(
            render_html(r#"<div class="unstableWrapper">x</div>"#),
            "<p>&lt;div class=&quot;unstableWrapper&quot;&gt;x&lt;/div&gt;</p>"
        );
    }

    #[test]
    fn test_math_disabled_by_default() {
        assert_eq!(render_html("$x^2$"), "<p>$x^2$</p>");
    }

    #[test]
    fn test_math() {
        let render = |markdown: &str| {
            MarkdownRenderer::<ChatBackend>::new()
                .with_math(true)
                .render_markdown(markdown)
                .html
        };
        assert_eq!(
            render("Area $\\pi r^2$ here"),
            r#"<p>Area <span class="math inline">\pi r^2</span> here</p>"#
        );
        assert_eq!(
            render("$$a < b$$"),
            r#"<p><span class="math display">a &lt; b</span></p>"#
        );
    }

    #[test]
    fn test_unterminated_fence_renders_as_code() {
        let html = render_html("```rust\nfn main");
        assert!(html.starts_with(r#"<pre class="code-block language-rust">"#));
        assert!(html.contains(r#"<code class="hljs">fn main"#));
        assert!(html.ends_with("</code></pre>"));
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let html = render_html("    let x = 1;");
        assert!(html.contains("<span>text</span>"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn test_gfm_disabled() {
        let html = MarkdownRenderer::<ChatBackend>::new()
            .with_gfm(false)
            .render_markdown("~~x~~")
            .html;
        assert_eq!(html, "<p>~~x~~</p>");
    }

    #[test]
    fn test_clipboard_backend() {
        let html = MarkdownRenderer::<ClipboardBackend>::new()
            .render_markdown("```py\nprint(1)\n```")
            .html;
        assert_eq!(html, r#"<pre><code class="language-py">print(1)
</code></pre>"#);
    }

    #[test]
    fn test_processor_result_collected() {
        let result = MarkdownRenderer::<ChatBackend>::new()
            .with_processor(ChartProcessor::new())
            .render_markdown("```chart\nrevenue\n```\n\n```chart\ncosts\n```");
        let ids: Vec<_> = result.extracted.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["revenue", "costs"]);
        assert_eq!(result.extracted[1].index, 1);
        assert!(result.html.contains(r#"data-id="revenue""#));
    }

    #[test]
    fn test_processor_order_first_wins() {
        struct Fixed(&'static str);

        impl CodeBlockProcessor for Fixed {
            fn process(&mut self, _language: &str, _source: &str, _index: usize) -> ProcessResult {
                ProcessResult::Inline(self.0.to_owned())
            }
        }

        let html = MarkdownRenderer::<ChatBackend>::new()
            .with_processor(Fixed("<p>first</p>"))
            .with_processor(Fixed("<p>second</p>"))
            .render_markdown("```x\ny\n```")
            .html;
        assert_eq!(html, "<p>first</p>");
    }

    #[test]
    fn test_processors_skip_blocks_without_language() {
        let result = MarkdownRenderer::<ChatBackend>::new()
            .with_processor(ChartProcessor::new())
            .render_markdown("```\nchart\n```");
        assert!(result.extracted.is_empty());
        assert!(result.html.contains("<code class=\"hljs\">chart\n</code>"));
    }
}
