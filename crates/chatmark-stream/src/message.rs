//! Accumulation of streamed message deltas.
//!
//! Providers stream reasoning either in a separate field or inline between
//! `<think>` tags. Both end up as a think block that is split off the visible
//! content once it closes, so the rendered buffer is reset at that point.

use std::time::{Duration, Instant};

/// One delta from the completion stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageDelta {
    /// Regular content.
    pub content: String,
    /// Reasoning content sent in a separate field.
    pub reasoning: Option<String>,
    /// Set on the last delta of a response.
    pub finish_reason: Option<String>,
}

impl MessageDelta {
    /// Delta carrying only content.
    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
            ..Self::default()
        }
    }

    /// Delta carrying only reasoning.
    #[must_use]
    pub fn reasoning(text: impl Into<String>) -> Self {
        Self {
            reasoning: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Reasoning that was split off the visible content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThinkBlock {
    /// Everything from `<think>` through `</think>`.
    pub content: String,
    /// Time between the start of the block and its end.
    pub duration: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ThinkState {
    None,
    Open { started: Instant },
    Closed(ThinkBlock),
}

/// Effect of a delta on the visible buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferChange {
    /// Nothing was added.
    Unchanged,
    /// Text was appended.
    Appended,
    /// The buffer was replaced; renders of it must start over.
    Reset,
}

/// Visible content of a streamed assistant message.
#[derive(Clone, Debug)]
pub struct MessageBuffer {
    content: String,
    think: ThinkState,
    reasoning: bool,
}

impl MessageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: String::new(),
            think: ThinkState::None,
            reasoning: false,
        }
    }

    /// The markdown to render.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The think block once it has closed.
    #[must_use]
    pub fn think(&self) -> Option<&ThinkBlock> {
        match &self.think {
            ThinkState::Closed(block) => Some(block),
            ThinkState::None | ThinkState::Open { .. } => None,
        }
    }

    /// Whether a think block is open.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        matches!(self.think, ThinkState::Open { .. })
    }

    /// Add a delta received at `now`.
    pub fn push(&mut self, delta: &MessageDelta, now: Instant) -> BufferChange {
        let mut text = String::new();
        match delta.reasoning.as_deref() {
            Some(reasoning) => {
                if !self.reasoning {
                    self.reasoning = true;
                    text.push_str("<think>\n");
                }
                text.push_str(reasoning);
            }
            None if self.reasoning => {
                self.reasoning = false;
                if delta.finish_reason.is_none() || !delta.content.is_empty() {
                    text.push_str("</think>\n");
                }
            }
            None => {}
        }
        text.push_str(&delta.content);

        if text.is_empty() {
            return BufferChange::Unchanged;
        }

        if self.content.is_empty()
            && self.think == ThinkState::None
            && text.starts_with("<think>")
        {
            self.think = ThinkState::Open { started: now };
        }

        if let ThinkState::Open { started } = self.think
            && let Some(index) = text.find("</think>")
        {
            let split = index + "</think>".len();
            let mut content = std::mem::take(&mut self.content);
            content.push_str(&text[..split]);
            self.think = ThinkState::Closed(ThinkBlock {
                content,
                duration: now.saturating_duration_since(started),
            });
            tracing::debug!(len = split, "Think block closed");
            self.content.push_str(&text[split..]);
            return BufferChange::Reset;
        }

        self.content.push_str(&text);
        BufferChange::Appended
    }

    /// Close the message at `now`.
    ///
    /// An unterminated think block absorbs the remaining content. Returns
    /// [`BufferChange::Reset`] in that case.
    pub fn finish(&mut self, now: Instant) -> BufferChange {
        self.reasoning = false;
        let ThinkState::Open { started } = self.think else {
            return BufferChange::Unchanged;
        };

        self.think = ThinkState::Closed(ThinkBlock {
            content: std::mem::take(&mut self.content),
            duration: now.saturating_duration_since(started),
        });
        BufferChange::Reset
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
