//! HTML escaping shared by rendering and incremental patching.
//!
//! The patcher decodes text it splices into existing text nodes. It must
//! undo exactly what the renderer escaped, so both directions use one table.

use std::borrow::Cow;

/// Characters escaped in rendered HTML and their references.
const ESCAPES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
];

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match ESCAPES.iter().find(|(ch, _)| *ch == c) {
            Some((_, reference)) => result.push_str(reference),
            None => result.push(c),
        }
    }
    result
}

/// Reverse [`escape_html`].
///
/// Decodes only the references [`escape_html`] produces, in a single
/// left-to-right pass, so `&amp;lt;` becomes `&lt;` and not `<`. Other
/// references are left as they are.
#[must_use]
pub fn unescape_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ESCAPES
            .iter()
            .find(|(_, reference)| rest.starts_with(reference))
        {
            Some((ch, reference)) => {
                out.push(*ch);
                rest = &rest[reference.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
