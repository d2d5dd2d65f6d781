//! Error types for DOM parsing.

/// Error while parsing an HTML fragment.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// Markup could not be tokenized (e.g. a tag cut off at end of input).
    #[error("HTML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Attribute syntax error.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
