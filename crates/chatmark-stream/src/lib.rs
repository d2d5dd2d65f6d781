//! Incremental streaming renderer for markdown chat messages.
//!
//! A completion stream delivers a message as a growing markdown buffer. This
//! crate keeps a rendered view of that buffer up to date without rebuilding
//! it on every delta:
//!
//! - Content that can no longer change is rendered once with the Full engine
//!   and committed ([`scanner`] finds the boundary, [`find_stable_split`]
//!   maps it back to markdown).
//! - The tail is re-rendered with the Fast engine on every tick and patched
//!   into the view, preferring text appends over node replacement ([`apply_patch`]).
//!
//! [`StreamSession`] ties these together for one message; [`StreamDriver`]
//! feeds it from stream events through a [`RenderThrottle`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chatmark_renderer::Renderers;
//! use chatmark_stream::StreamSession;
//!
//! let mut session = StreamSession::new(Arc::new(Renderers::default()));
//! session.render("# Title\n\nSome ");
//! session.render("# Title\n\nSome text.");
//! session.finish("# Title\n\nSome text.");
//!
//! assert_eq!(
//!     session.output().inner_html(),
//!     "<h1>Title</h1><p>Some text.</p>"
//! );
//! ```

mod driver;
mod error;
mod message;
mod patch;
mod promote;
pub mod scanner;
mod session;
mod throttle;

pub use driver::{StreamDriver, StreamEvent};
pub use error::ScanError;
pub use message::{BufferChange, MessageBuffer, MessageDelta, ThinkBlock};
pub use patch::{PatchOutcome, apply_patch, common_affixes};
pub use promote::find_stable_split;
pub use scanner::stable_boundary;
pub use session::{RenderTick, StreamSession, UNSTABLE_WRAPPER_CLASS};
pub use throttle::{DEFAULT_THROTTLE_INTERVAL, RenderThrottle};
