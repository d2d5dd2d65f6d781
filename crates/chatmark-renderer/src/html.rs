//! HTML backends for markdown rendering.

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::escape::escape_html;

/// Chat view backend.
///
/// Code blocks get a sticky header with the language label and the
/// download/copy buttons the message list wires up:
///
/// ```text
/// <pre class="code-block language-rust">
///   <div class="code-header sticky"><span>rust</span><span>…buttons…</span></div>
///   <code class="hljs">…</code>
/// </pre>
/// ```
pub struct ChatBackend;

impl RenderBackend for ChatBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        write_code_block(lang, &escape_html(content), out);
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write_image(src, alt, title, out);
    }
}

/// Clipboard backend.
///
/// Produces plain semantic HTML (`<pre><code class="language-x">`) for
/// copying a message as `text/html`.
pub struct ClipboardBackend;

impl RenderBackend for ClipboardBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        write_image(src, alt, title, out);
    }
}

/// Write a chat code block around an already-escaped (or highlighted) body.
pub fn write_code_block(lang: Option<&str>, body_html: &str, out: &mut String) {
    let lang = escape_html(lang.unwrap_or(""));
    let label = if lang.is_empty() { "text" } else { lang.as_str() };
    write!(
        out,
        concat!(
            r#"<pre class="code-block language-{lang}">"#,
            r#"<div class="code-header sticky"><span>{label}</span><span>"#,
            r#"<button class="i download" data-action="download" title="Download code"></button>"#,
            r#"<button class="i copy" data-action="copy" title="Copy code"></button>"#,
            r#"</span></div><code class="hljs">{body}</code></pre>"#
        ),
        lang = lang,
        label = label,
        body = body_html
    )
    .unwrap();
}

fn write_image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}
