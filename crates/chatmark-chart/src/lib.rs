//! Charts embedded in chat messages.
//!
//! The model creates a chart through a tool call carrying a [`ChartConfig`]
//! and references it from its answer with a ```` ```chart ```` fence holding
//! the chart identifier. The renderer turns the fence into a placeholder;
//! [`ChartRegistry`] owns the charts the placeholders resolve to.

mod config;
mod error;
mod registry;

pub use config::{COLOR_PALETTE, ChartConfig, ChartData, deep_merge, hex_to_rgba};
pub use error::ChartError;
pub use registry::{ChartHandle, ChartRegistry};
