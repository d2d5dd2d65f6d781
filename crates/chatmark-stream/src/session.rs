//! Per-message streaming render state.

use std::sync::Arc;

use chatmark_dom::{DomError, Element, Node, parse_fragment};
use chatmark_renderer::Renderers;

use crate::patch::{PatchOutcome, apply_patch};
use crate::promote::find_stable_split;
use crate::scanner::stable_boundary;

/// Class of the element holding content that is still re-rendered.
pub const UNSTABLE_WRAPPER_CLASS: &str = "unstableWrapper";

/// What a single [`StreamSession::render`] or [`StreamSession::finish`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderTick {
    /// The buffer shrank and the session started over from an empty output.
    pub reset: bool,
    /// Bytes of markdown committed to the stable region.
    pub promoted: usize,
    /// How the unstable subtree was updated; `None` when the new markup
    /// could not be parsed and the previous DOM was kept.
    pub patch: Option<PatchOutcome>,
    /// Chart identifiers emitted by the committed content.
    pub charts: Vec<String>,
}

/// Incremental renderer for one streamed message.
///
/// The output element holds the committed (stable) content followed by a
/// single `div.unstableWrapper` holding the lenient render of the rest of
/// the buffer. Each [`render`](Self::render) call:
///
/// 1. renders the unstable tail with the Fast engine,
/// 2. promotes completed top-level blocks out of the tail when a markdown
///    split reproducing them exactly can be found,
/// 3. patches the wrapper from the previous tail render to the new one.
///
/// [`finish`](Self::finish) dissolves the wrapper into one Full render of
/// whatever is left. Nothing here fails: anomalies are logged and the tick
/// degrades to promoting nothing or keeping the previous DOM.
#[derive(Debug)]
pub struct StreamSession {
    renderers: Arc<Renderers>,
    output: Element,
    stable_offset: usize,
    previous_unstable_html: String,
    previous_shrink_failure: usize,
    last_buffer_len: usize,
}

impl StreamSession {
    /// Create a session rendering into an empty `div.content`.
    #[must_use]
    pub fn new(renderers: Arc<Renderers>) -> Self {
        Self::with_output(renderers, Element::new("div").with_attr("class", "content"))
    }

    /// Create a session rendering into `output`.
    ///
    /// Existing children are kept as committed content; see [`skip`](Self::skip).
    /// A [`reset`](Self::reset), including the one a shrunk buffer triggers,
    /// discards them along with everything rendered since.
    #[must_use]
    pub fn with_output(renderers: Arc<Renderers>, output: Element) -> Self {
        Self {
            renderers,
            output,
            stable_offset: 0,
            previous_unstable_html: String::new(),
            previous_shrink_failure: 0,
            last_buffer_len: 0,
        }
    }

    /// The rendered output.
    #[must_use]
    pub fn output(&self) -> &Element {
        &self.output
    }

    /// Consume the session and return the rendered output.
    #[must_use]
    pub fn into_output(self) -> Element {
        self.output
    }

    /// Bytes of the buffer already committed to the stable region.
    #[must_use]
    pub fn stable_offset(&self) -> usize {
        self.stable_offset
    }

    /// The Fast render the unstable subtree currently shows.
    #[must_use]
    pub fn unstable_html(&self) -> &str {
        &self.previous_unstable_html
    }

    /// Bring the output up to date with `buffer`.
    ///
    /// Safe to call repeatedly; calling it twice with the same buffer leaves
    /// the output unchanged. A buffer shorter than the previous one resets
    /// the session first.
    pub fn render(&mut self, buffer: &str) -> RenderTick {
        let mut tick = RenderTick {
            reset: self.reset_if_shrunk(buffer),
            ..RenderTick::default()
        };
        self.last_buffer_len = buffer.len();
        self.wrapper_index();

        let unstable = &buffer[self.stable_offset..];
        let mut new_html = self.renderers.fast.render_html(unstable);

        let promoted = match stable_boundary(&new_html) {
            Ok(candidate) if !candidate.is_empty() => {
                self.try_promote(unstable, candidate, &mut tick)
            }
            Ok(_) => None,
            Err(error) => {
                tracing::debug!(%error, "No stable boundary in unstable render");
                None
            }
        };
        if let Some(cut) = promoted {
            new_html.drain(..cut);
        }

        let previous = std::mem::take(&mut self.previous_unstable_html);
        let wrapper = self.wrapper_mut();
        match apply_patch(wrapper, &previous, &new_html) {
            Ok(outcome) => {
                tracing::trace!(?outcome, len = new_html.len(), "Patched unstable subtree");
                tick.patch = Some(outcome);
                self.previous_unstable_html = new_html;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to patch unstable subtree, keeping previous DOM");
                self.previous_unstable_html = previous;
            }
        }

        tick
    }

    /// Declare `buffer` committed elsewhere.
    ///
    /// Moves the stable offset to the end of `buffer` without rendering it.
    /// The unstable subtree is dropped; the next render starts a new one.
    pub fn skip(&mut self, buffer: &str) {
        self.remove_wrapper();
        self.stable_offset = buffer.len();
        self.last_buffer_len = buffer.len();
        self.previous_unstable_html.clear();
        self.previous_shrink_failure = 0;
    }

    /// Commit the rest of `buffer` with one Full render.
    ///
    /// The unstable wrapper is replaced by the rendered nodes. If the Full
    /// render cannot be parsed the wrapper is kept as it is.
    pub fn finish(&mut self, buffer: &str) -> RenderTick {
        let mut tick = RenderTick {
            reset: self.reset_if_shrunk(buffer),
            ..RenderTick::default()
        };

        let rest = &buffer[self.stable_offset..];
        let rendered = self.renderers.full.render(rest);
        let nodes = match parse_fragment(&rendered.html) {
            Ok(nodes) => nodes,
            Err(error) => {
                tracing::warn!(%error, "Failed to parse final render, keeping unstable subtree");
                return tick;
            }
        };

        self.remove_wrapper();
        self.output.append_children(nodes);

        tick.promoted = rest.len();
        tick.patch = Some(PatchOutcome::Replaced);
        tick.charts = rendered.extracted.into_iter().map(|block| block.id).collect();

        self.stable_offset = buffer.len();
        self.last_buffer_len = buffer.len();
        self.previous_unstable_html.clear();
        self.previous_shrink_failure = 0;
        tick
    }

    /// Discard all output and start over from an empty buffer.
    pub fn reset(&mut self) {
        tracing::debug!(stable_offset = self.stable_offset, "Resetting stream session");
        self.output.children.clear();
        self.stable_offset = 0;
        self.previous_unstable_html.clear();
        self.previous_shrink_failure = 0;
        self.last_buffer_len = 0;
    }

    fn reset_if_shrunk(&mut self, buffer: &str) -> bool {
        let shrunk = buffer.len() < self.last_buffer_len
            || buffer.len() < self.stable_offset
            || !buffer.is_char_boundary(self.stable_offset);
        if shrunk {
            self.reset();
        }
        shrunk
    }

    /// Promote the longest markdown prefix rendering to `candidate`.
    ///
    /// Returns the number of bytes to cut from the front of the new render.
    fn try_promote(&mut self, unstable: &str, candidate: &str, tick: &mut RenderTick) -> Option<usize> {
        let Some(len) = find_stable_split(
            &self.renderers.fast,
            unstable,
            candidate,
            self.previous_shrink_failure,
        ) else {
            tracing::trace!(
                unstable_len = unstable.len(),
                "No markdown split reproduces the stable candidate"
            );
            self.previous_shrink_failure = unstable.len();
            return None;
        };
        self.previous_shrink_failure = 0;

        match self.commit(&unstable[..len], candidate, tick) {
            Ok(()) => Some(candidate.len()),
            Err(error) => {
                tracing::warn!(%error, "Failed to commit stable content");
                None
            }
        }
    }

    /// Insert the Full render of `markdown` before the wrapper and drop the
    /// nodes showing `candidate` from the wrapper.
    fn commit(&mut self, markdown: &str, candidate: &str, tick: &mut RenderTick) -> Result<(), DomError> {
        let rendered = self.renderers.full.render(markdown);
        let index = self.wrapper_index();
        self.output.insert_html(index, &rendered.html)?;

        self.stable_offset += markdown.len();
        tick.promoted += markdown.len();
        tick.charts
            .extend(rendered.extracted.into_iter().map(|block| block.id));

        let promoted_nodes = parse_fragment(candidate).ok().map(|nodes| nodes.len());
        let rest = self
            .previous_unstable_html
            .strip_prefix(candidate)
            .map(str::to_owned);

        let wrapper = self.wrapper_mut();
        let remaining = match (rest, promoted_nodes) {
            (Some(rest), Some(count)) if count <= wrapper.children.len() => {
                wrapper.children.drain(..count);
                rest
            }
            _ => {
                wrapper.children.clear();
                String::new()
            }
        };
        self.previous_unstable_html = remaining;
        Ok(())
    }

    /// Position of the wrapper in the output, appending one if missing.
    fn wrapper_index(&mut self) -> usize {
        if let Some(index) = self.output.child_position_with_class(UNSTABLE_WRAPPER_CLASS) {
            return index;
        }

        self.previous_unstable_html.clear();
        self.output.children.push(Node::Element(
            Element::new("div").with_attr("class", UNSTABLE_WRAPPER_CLASS),
        ));
        self.output.children.len() - 1
    }

    fn wrapper_mut(&mut self) -> &mut Element {
        let index = self.wrapper_index();
        match &mut self.output.children[index] {
            Node::Element(wrapper) => wrapper,
            Node::Text(_) => unreachable!("wrapper position always holds an element"),
        }
    }

    fn remove_wrapper(&mut self) {
        if let Some(index) = self.output.child_position_with_class(UNSTABLE_WRAPPER_CLASS) {
            self.output.remove_child(index);
        }
    }
}
