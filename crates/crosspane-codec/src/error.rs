/// Errors that can occur while encoding or decoding messages and handlers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is present but is not well-formed structured data.
    #[error("payload is not a well-formed message: {0}")]
    Parse(#[from] serde_json::Error),

    /// The decoded object does not have exactly one top-level key.
    #[error("message must contain exactly one top-level key (found {count})")]
    NotSingleKey { count: usize },

    /// A portable handler representation could not be split into its
    /// parameter list and body.
    #[error("malformed handler source: {0}")]
    MalformedHandler(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
