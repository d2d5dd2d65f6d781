//! Owned DOM tree for rendered chat messages.
//!
//! The streaming renderer mutates a message view the way a browser page would
//! be mutated: appending to text nodes, appending parsed markup, and replacing
//! a subtree's children wholesale. This crate models exactly that much of the
//! DOM:
//!
//! - [`Element`] / [`Node`]: the tree itself, owned and cloneable
//! - [`parse_fragment`]: lenient HTML fragment parsing (`innerHTML` semantics)
//! - [`Element::inner_html`]: serialization back to HTML
//!
//! # Example
//!
//! ```
//! use chatmark_dom::Element;
//!
//! let mut root = Element::new("div");
//! root.set_inner_html("<p>Hello <strong>world</strong></p>").unwrap();
//! assert_eq!(root.text_content(), "Hello world");
//!
//! let p = root.last_element_child_mut().unwrap();
//! p.append_text("!");
//! assert_eq!(root.inner_html(), "<p>Hello <strong>world</strong>!</p>");
//! ```

mod entities;
mod error;
mod node;
mod parser;
mod serializer;

pub use error::DomError;
pub use node::{Element, Node};
pub use parser::parse_fragment;

/// HTML elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Check whether a tag name is an HTML void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}
