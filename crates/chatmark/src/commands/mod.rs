//! CLI command implementations.

pub(crate) mod copy_html;
pub(crate) mod render;
pub(crate) mod replay;
mod settings;

pub(crate) use copy_html::CopyHtmlArgs;
pub(crate) use render::RenderArgs;
pub(crate) use replay::ReplayArgs;
