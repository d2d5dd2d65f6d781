//! Tag-balance scanner.
//!
//! Finds where the last top-level element of a lenient render begins. The
//! HTML before that point is the candidate for promotion: every element in it
//! is closed, and it ends exactly at the close of a top-level element.

use std::sync::LazyLock;

use chatmark_dom::is_void_element;
use regex::Regex;

use crate::error::ScanError;

/// A tag at the start of a segment: `<name …>`, `</name>` or `<name …/>`.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</?([a-zA-Z][a-zA-Z0-9-]*).*?/?>").expect("invalid tag regex")
});

/// Return the prefix of `html` that precedes its last top-level element.
///
/// - Without any `>` the whole string is plain text and returned as is.
/// - Plain text after the last `>` makes everything through that `>` stable.
/// - Otherwise the tags are walked backwards with an explicit stack until the
///   opening tag of the last top-level element; void elements and `/>` tags
///   never touch the stack.
///
/// An empty prefix means no boundary was found yet.
///
/// # Errors
///
/// Returns a [`ScanError`] when the markup cannot be balanced: an unfinished
/// tag in the trailer, a closing tag without opening tag, a `<` that does not
/// start a tag, or opening and closing names that disagree.
pub fn stable_boundary(html: &str) -> Result<&str, ScanError> {
    let Some(last_gt) = html.rfind('>') else {
        return Ok(html);
    };

    let trailer = &html[last_gt + 1..];
    if !trailer.trim().is_empty() {
        if trailer.contains('<') {
            return Err(ScanError::UnclosedTrailer(trailer.to_owned()));
        }
        return Ok(&html[..=last_gt]);
    }

    let mut stack: Vec<&str> = Vec::new();
    let mut end = html.len();

    loop {
        let Some(start) = html[..end].rfind('<') else {
            return Err(ScanError::Unopened(stack.last().map(|tag| (*tag).to_owned())));
        };

        let segment = &html[start..end];
        let Some(captures) = TAG_PATTERN.captures(segment) else {
            return Err(ScanError::Malformed(segment.to_owned()));
        };
        end = start;

        let tag = captures.get(0).map_or("", |m| m.as_str());
        let name = captures.get(1).map_or("", |m| m.as_str());

        if tag.starts_with("</") {
            stack.push(name);
            continue;
        }

        if !is_void_element(name) && !tag.ends_with("/>") {
            let expected = stack.pop();
            if expected != Some(name) {
                return Err(ScanError::Mismatched {
                    expected: expected.map(str::to_owned),
                    found: name.to_owned(),
                });
            }
        }

        if stack.is_empty() {
            return Ok(&html[..end]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_is_fully_stable() {
        assert_eq!(stable_boundary("just text"), Ok("just text"));
        assert_eq!(stable_boundary(""), Ok(""));
    }

    #[test]
    fn test_trailing_text_after_element() {
        assert_eq!(stable_boundary("<p>a</p>tail"), Ok("<p>a</p>"));
    }

    #[test]
    fn test_unfinished_tag_in_trailer() {
        assert_eq!(
            stable_boundary("<p>a</p>x<em"),
            Err(ScanError::UnclosedTrailer("x<em".to_owned()))
        );
    }

    #[test]
    fn test_single_element_has_empty_boundary() {
        assert_eq!(stable_boundary("<p>Hello <strong>world</strong></p>"), Ok(""));
    }

    #[test]
    fn test_boundary_before_last_element() {
        assert_eq!(
            stable_boundary("<h1>Title</h1><p>Some</p>"),
            Ok("<h1>Title</h1>")
        );
    }

    #[test]
    fn test_nested_elements() {
        assert_eq!(
            stable_boundary("<p>a</p><ul><li><p>x</p></li><li>y</li></ul>"),
            Ok("<p>a</p>")
        );
    }

    #[test]
    fn test_trailing_whitespace_is_ignored() {
        assert_eq!(stable_boundary("<p>a</p><p>b</p>\n"), Ok("<p>a</p>"));
    }

    #[test]
    fn test_void_elements_never_enter_stack() {
        assert_eq!(
            stable_boundary(r#"<p>a</p><p><img src="x" alt="">b<br></p>"#),
            Ok("<p>a</p>")
        );
        assert_eq!(stable_boundary(r#"<p>a</p><hr>"#), Ok("<p>a</p>"));
    }

    #[test]
    fn test_void_element_without_closing_parent() {
        // A top-level void element is an element of its own.
        assert_eq!(stable_boundary(r#"<img src="x">"#), Ok(""));
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(stable_boundary("<p>a</p><x-widget/>"), Ok("<p>a</p>"));
    }

    #[test]
    fn test_unopened_tag() {
        assert_eq!(
            stable_boundary("a</p>"),
            Err(ScanError::Unopened(Some("p".to_owned())))
        );
    }

    #[test]
    fn test_malformed_tag() {
        assert_eq!(
            stable_boundary("<p>1 < 2</p>"),
            Err(ScanError::Malformed("< 2".to_owned()))
        );
    }

    #[test]
    fn test_mismatched_tag() {
        assert_eq!(
            stable_boundary("<div><p>a</div>"),
            Err(ScanError::Mismatched {
                expected: Some("div".to_owned()),
                found: "p".to_owned(),
            })
        );
    }

    #[test]
    fn test_code_block_markup_balances() {
        let html = concat!(
            "<p>intro</p>",
            r#"<pre class="code-block language-rust"><div class="code-header sticky"><span>rust</span><span>"#,
            r#"<button class="i copy" data-action="copy" title="Copy code"></button></span></div>"#,
            r#"<code class="hljs">a &lt; b</code></pre>"#
        );
        assert_eq!(stable_boundary(html), Ok("<p>intro</p>"));
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            stable_boundary("<p>héllo 世界</p><p>ünï</p>"),
            Ok("<p>héllo 世界</p>")
        );
    }
}
