//! Error types for the protocol layer.
//!
//! Each crate in boomcats defines its own error enum. A `ProtocolError`
//! always means an inbound line could not be understood; the caller drops
//! the line and carries on.

/// Errors that can occur while decoding an inbound line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The line breaks the framing rules or the command grammar:
    /// embedded newline, oversized, unknown verb, wrong arity, or an
    /// argument that does not parse.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl ProtocolError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput(reason.into())
    }
}
