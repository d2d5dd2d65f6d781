//! Tree node representation.

use crate::error::DomError;
use crate::parser::parse_fragment;
use crate::serializer::{serialize_children, serialize_node};

/// A node in the DOM tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with attributes and children.
    Element(Element),
    /// Decoded text run.
    Text(String),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Borrow the element if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Mutably borrow the element if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize this node as HTML.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize_node(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
    }
}

/// An element node.
///
/// Attributes keep their source order so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Index of the first direct child element carrying `class`.
    #[must_use]
    pub fn child_position_with_class(&self, class: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.as_element().is_some_and(|el| el.has_class(class)))
    }

    /// Mutable access to the child element at `index`.
    pub fn child_element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    /// Last child that is an element (`lastElementChild`).
    #[must_use]
    pub fn last_element_child(&self) -> Option<&Element> {
        self.children.iter().rev().find_map(Node::as_element)
    }

    /// Mutable `lastElementChild`.
    pub fn last_element_child_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().rev().find_map(Node::as_element_mut)
    }

    /// Append text, extending the last child when it is already a text node.
    pub fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::text(text));
        }
    }

    /// Append nodes, merging a leading text node into a trailing one.
    pub fn append_children(&mut self, nodes: Vec<Node>) {
        for node in nodes {
            match node {
                Node::Text(text) => self.append_text(&text),
                element @ Node::Element(_) => self.children.push(element),
            }
        }
    }

    /// Insert nodes before the child at `index`.
    ///
    /// Returns the number of nodes inserted.
    pub fn insert_children(&mut self, index: usize, nodes: Vec<Node>) -> usize {
        let count = nodes.len();
        let index = index.min(self.children.len());
        self.children.splice(index..index, nodes);
        count
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Concatenated text of all descendants (`textContent`).
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            collect_text(child, &mut out);
        }
        out
    }

    /// Serialize children as HTML (`innerHTML` getter).
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize_children(&self.children, &mut out);
        out
    }

    /// Replace all children with parsed `html` (`innerHTML` setter).
    ///
    /// The tree is left untouched when parsing fails.
    pub fn set_inner_html(&mut self, html: &str) -> Result<(), DomError> {
        self.children = parse_fragment(html)?;
        Ok(())
    }

    /// Parse `html` and append it (`insertAdjacentHTML("beforeend")`).
    pub fn append_html(&mut self, html: &str) -> Result<(), DomError> {
        let nodes = parse_fragment(html)?;
        self.append_children(nodes);
        Ok(())
    }

    /// Parse `html` and insert it before the child at `index`.
    ///
    /// Returns the number of top-level nodes inserted.
    pub fn insert_html(&mut self, index: usize, html: &str) -> Result<usize, DomError> {
        let nodes = parse_fragment(html)?;
        Ok(self.insert_children(index, nodes))
    }

    /// Number of text nodes in this subtree.
    #[must_use]
    pub fn text_node_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Text(_) => 1,
                Node::Element(element) => element.text_node_count(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn div(html: &str) -> Element {
        let mut el = Element::new("div");
        el.set_inner_html(html).unwrap();
        el
    }

    #[test]
    fn test_append_text_merges_into_last_text_node() {
        let mut el = div("<p>a</p>tail");
        el.append_text(" more");
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.inner_html(), "<p>a</p>tail more");
    }

    #[test]
    fn test_append_text_after_element_creates_node() {
        let mut el = div("<p>a</p>");
        el.append_text("b");
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.children[1], Node::text("b"));
    }

    #[test]
    fn test_append_empty_text_is_noop() {
        let mut el = div("<p>a</p>");
        el.append_text("");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_last_element_child_skips_text() {
        let el = div("<p>one</p><em>two</em> trailing");
        assert_eq!(el.last_element_child().map(|e| e.tag.as_str()), Some("em"));
    }

    #[test]
    fn test_has_class() {
        let el = Element::new("pre").with_attr("class", "code-block language-rust");
        assert!(el.has_class("code-block"));
        assert!(el.has_class("language-rust"));
        assert!(!el.has_class("code"));
    }

    #[test]
    fn test_child_position_with_class() {
        let el = div(r#"<p>x</p><div class="unstableWrapper"></div>"#);
        assert_eq!(el.child_position_with_class("unstableWrapper"), Some(1));
        assert_eq!(el.child_position_with_class("missing"), None);
    }

    #[test]
    fn test_insert_html_before_index() {
        let mut el = div(r#"<div class="w"></div>"#);
        let inserted = el.insert_html(0, "<h1>T</h1><p>x</p>").unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(el.inner_html(), r#"<h1>T</h1><p>x</p><div class="w"></div>"#);
    }

    #[test]
    fn test_set_inner_html_keeps_tree_on_error() {
        let mut el = div("<p>keep</p>");
        assert!(el.set_inner_html("<p>broken <a href=").is_err());
        assert_eq!(el.inner_html(), "<p>keep</p>");
    }

    #[test]
    fn test_remove_child() {
        let mut el = div("<p>a</p><p>b</p>");
        let removed = el.remove_child(0).unwrap();
        assert_eq!(removed.text_content(), "a");
        assert!(el.remove_child(5).is_none());
    }

    #[test]
    fn test_text_content_and_count() {
        let el = div("<p>Hello <strong>world</strong>!</p>");
        assert_eq!(el.text_content(), "Hello world!");
        assert_eq!(el.text_node_count(), 3);
    }
}
