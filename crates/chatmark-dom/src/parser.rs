//! Lenient HTML fragment parser.
//!
//! Markdown renderers emit HTML rather than XML: void elements are never
//! closed, boolean attributes carry no value, and raw HTML passed through from
//! the source may leave elements unclosed. The tokenizer is configured to
//! tolerate all of that and a small stack machine rebuilds the tree the way
//! `innerHTML` would for well-nested input.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::decode_entity;
use crate::error::DomError;
use crate::is_void_element;
use crate::node::{Element, Node};

/// Parse an HTML fragment into a list of top-level nodes.
///
/// - Void elements (`<br>`, `<img …>`) never take children.
/// - End tags close the nearest open element with the same name; stray end
///   tags are ignored.
/// - Elements still open at end of input are closed implicitly.
///
/// # Errors
///
/// Returns an error if the fragment cannot be tokenized, for example when
/// the input ends inside a tag.
pub fn parse_fragment(html: &str) -> Result<Vec<Node>, DomError> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut tree = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = decode_element(&reader, &e)?;
                if is_void_element(&element.tag) {
                    tree.push(Node::Element(element));
                } else {
                    tree.open.push(element);
                }
            }
            Event::Empty(e) => {
                let element = decode_element(&reader, &e)?;
                tree.push(Node::Element(element));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                tree.current().append_text(&text);
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?;
                tree.current().append_text(&decode_entity(&name));
            }
            Event::CData(e) => {
                tree.current().append_text(&String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let qname = e.name();
                let name = reader.decoder().decode(qname.as_ref())?;
                tree.close(&name.to_ascii_lowercase());
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    Ok(tree.finish())
}

fn decode_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Element, DomError> {
    let tag = reader
        .decoder()
        .decode(e.name().as_ref())?
        .to_ascii_lowercase();
    let mut element = Element::new(tag);
    for attr in e.html_attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.to_ascii_lowercase();
        let value = decode_references(&reader.decoder().decode(&attr.value)?);
        element.attrs.push((key, value));
    }
    Ok(element)
}

/// Replace `&name;` references inside attribute values.
fn decode_references(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) if semi > 0 && !after[..semi].contains(['&', ' ']) => {
                out.push_str(&decode_entity(&after[..semi]));
                rest = &after[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Fragment root plus the elements still open below it.
#[derive(Default)]
struct TreeBuilder {
    root: Element,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn current(&mut self) -> &mut Element {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn push(&mut self, node: Node) {
        self.current().children.push(node);
    }

    fn pop_into_parent(&mut self) {
        if let Some(element) = self.open.pop() {
            self.push(Node::Element(element));
        }
    }

    /// Close the innermost open `tag` and everything opened after it.
    fn close(&mut self, tag: &str) {
        let Some(index) = self.open.iter().rposition(|el| el.tag == tag) else {
            return;
        };
        while self.open.len() > index {
            self.pop_into_parent();
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.pop_into_parent();
        }
        self.root.children
    }
}
