//! Error types for the streaming renderer.

/// Why the tag-balance scanner found no stable boundary.
///
/// None of these are fatal: the session logs them and promotes nothing for
/// the current tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Text after the last `>` contains the start of an unfinished tag.
    #[error("unclosed tag in trailer: {0:?}")]
    UnclosedTrailer(String),

    /// A closing tag has no opening tag before it.
    #[error("unopened tag: {}", .0.as_deref().unwrap_or("<none>"))]
    Unopened(Option<String>),

    /// A `<` does not start a tag.
    #[error("malformed tag: {0:?}")]
    Malformed(String),

    /// An opening tag does not match the innermost closing tag.
    #[error("mismatched tag: expected {}, found {found}", .expected.as_deref().unwrap_or("<none>"))]
    Mismatched {
        expected: Option<String>,
        found: String,
    },
}
