//! Drives a session from completion stream events.

use std::time::Instant;

use crate::message::{BufferChange, MessageBuffer, MessageDelta};
use crate::session::{RenderTick, StreamSession};
use crate::throttle::RenderThrottle;

/// Event from a completion stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// New content and/or reasoning.
    Delta(MessageDelta),
    /// The stream ended normally.
    Done,
    /// The stream was cancelled.
    Abort,
}

/// Owns the render state of one in-flight assistant message.
///
/// Deltas are accumulated immediately; renders are throttled and always use
/// the latest buffer. `Done` and `Abort` both flush with one Full render.
#[derive(Debug)]
pub struct StreamDriver {
    session: StreamSession,
    message: MessageBuffer,
    throttle: RenderThrottle,
    finished: bool,
}

impl StreamDriver {
    #[must_use]
    pub fn new(session: StreamSession, throttle: RenderThrottle) -> Self {
        Self {
            session,
            message: MessageBuffer::new(),
            throttle,
            finished: false,
        }
    }

    /// Handle `event` received at `now`.
    ///
    /// Returns the tick when a render happened.
    pub fn handle(&mut self, event: StreamEvent, now: Instant) -> Option<RenderTick> {
        if self.finished {
            tracing::debug!(?event, "Ignoring event after stream end");
            return None;
        }

        match event {
            StreamEvent::Delta(delta) => {
                match self.message.push(&delta, now) {
                    BufferChange::Unchanged => {}
                    BufferChange::Appended => self.throttle.request(now),
                    BufferChange::Reset => {
                        self.session.reset();
                        self.throttle.request(now);
                    }
                }
                self.tick(now)
            }
            StreamEvent::Done => Some(self.finish(now)),
            StreamEvent::Abort => {
                tracing::info!(len = self.message.content().len(), "Stream aborted");
                Some(self.finish(now))
            }
        }
    }

    /// Render if the throttle interval has passed.
    pub fn tick(&mut self, now: Instant) -> Option<RenderTick> {
        if self.finished || !self.throttle.poll(now) {
            return None;
        }
        Some(self.session.render(self.message.content()))
    }

    fn finish(&mut self, now: Instant) -> RenderTick {
        self.throttle.flush();
        if self.message.finish(now) == BufferChange::Reset {
            self.session.reset();
        }
        self.finished = true;
        self.session.finish(self.message.content())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    #[must_use]
    pub fn message(&self) -> &MessageBuffer {
        &self.message
    }

    /// Next instant at which [`tick`](Self::tick) may render.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Consume the driver and return the session and message.
    #[must_use]
    pub fn into_parts(self) -> (StreamSession, MessageBuffer) {
        (self.session, self.message)
    }
}
