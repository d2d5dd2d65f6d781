//! Incremental HTML patcher.
//!
//! Reconciles the unstable subtree with a new lenient render. When the new
//! HTML only inserts text or new elements at the end of the deepest open
//! element, the existing nodes are extended in place; anything else replaces
//! the subtree's children.

use chatmark_dom::{DomError, Element, parse_fragment};
use chatmark_renderer::unescape_html;

/// How the unstable subtree was updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The HTML did not change.
    Unchanged,
    /// Text and/or elements were appended to an existing element.
    Appended,
    /// The subtree's children were replaced.
    Replaced,
}

/// Change from the previous to the new HTML.
#[derive(Debug, PartialEq, Eq)]
enum Patch<'a> {
    Unchanged,
    /// Insert `segment` into the element reached by descending `depth` times
    /// into the last element child.
    Append { depth: usize, segment: &'a str },
    Replace,
}

/// Length of the common prefix and of the common suffix of `old` and `new`.
///
/// The suffix is bounded so it does not overlap the prefix in either string.
/// Both lengths fall on character boundaries.
#[must_use]
pub fn common_affixes(old: &str, new: &str) -> (usize, usize) {
    let (old_bytes, new_bytes) = (old.as_bytes(), new.as_bytes());

    let mut prefix = old_bytes
        .iter()
        .zip(new_bytes)
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(prefix) {
        prefix -= 1;
    }

    let max_suffix = (old.len() - prefix).min(new.len() - prefix);
    let mut suffix = old_bytes
        .iter()
        .rev()
        .zip(new_bytes.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(old.len() - suffix) {
        suffix -= 1;
    }

    (prefix, suffix)
}

fn plan<'a>(old: &str, new: &'a str) -> Patch<'a> {
    if old == new {
        return Patch::Unchanged;
    }

    let (prefix, suffix) = common_affixes(old, new);
    if prefix + suffix < old.len() {
        return Patch::Replace;
    }

    let segment = &new[prefix..new.len() - suffix];
    if segment.contains("</") {
        return Patch::Replace;
    }

    Patch::Append {
        depth: old[old.len() - suffix..].matches("</").count(),
        segment,
    }
}

/// Update `wrapper`, whose children currently render `old`, to render `new`.
///
/// # Errors
///
/// Returns a [`DomError`] when the new markup cannot be parsed. The wrapper
/// is not modified in that case.
pub fn apply_patch(wrapper: &mut Element, old: &str, new: &str) -> Result<PatchOutcome, DomError> {
    match plan(old, new) {
        Patch::Unchanged => Ok(PatchOutcome::Unchanged),
        Patch::Append { depth, segment } => {
            if let Some(target) = descend(wrapper, depth) {
                append_segment(target, segment)?;
                return Ok(PatchOutcome::Appended);
            }
            tracing::trace!(depth, "Insertion target missing, replacing subtree");
            replace(wrapper, new)
        }
        Patch::Replace => replace(wrapper, new),
    }
}

fn replace(wrapper: &mut Element, new: &str) -> Result<PatchOutcome, DomError> {
    wrapper.set_inner_html(new)?;
    Ok(PatchOutcome::Replaced)
}

fn descend(element: &mut Element, depth: usize) -> Option<&mut Element> {
    let mut target = element;
    for _ in 0..depth {
        target = target.last_element_child_mut()?;
    }
    Some(target)
}

/// Append leading text to the last text node, and the markup after it as
/// new children.
fn append_segment(target: &mut Element, segment: &str) -> Result<(), DomError> {
    let (text, markup) = segment
        .find('<')
        .map_or((segment, ""), |index| segment.split_at(index));

    let nodes = if markup.is_empty() {
        Vec::new()
    } else {
        parse_fragment(markup)?
    };

    target.append_text(&unescape_html(text));
    target.append_children(nodes);
    Ok(())
}
