//! HTML serialization (`innerHTML` / `outerHTML` getters).

use std::fmt::Write;

use crate::is_void_element;
use crate::node::Node;

/// Serialize a list of sibling nodes.
pub(crate) fn serialize_children(nodes: &[Node], out: &mut String) {
    for node in nodes {
        serialize_node(node, out);
    }
}

/// Serialize a single node recursively.
pub(crate) fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_text(text, out),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (key, value) in &element.attrs {
                write!(out, r#" {key}=""#).unwrap();
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');

            if is_void_element(&element.tag) {
                return;
            }

            serialize_children(&element.children, out);
            write!(out, "</{}>", element.tag).unwrap();
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
