/// Errors that can occur in peer operations.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] crosspane_transport::TransportError),

    /// Message or handler encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] crosspane_codec::CodecError),

    /// Handler resolution or installation error.
    #[error("schema error: {0}")]
    Schema(#[from] crosspane_schema::SchemaError),

    /// `bind` was called while an event source is already bound.
    #[error("an event source is already bound")]
    AlreadyBound,

    /// `pump` was called with no event source bound.
    #[error("no event source bound")]
    NotBound,

    /// An `append` message did not carry `[messageType, sourceOrValue]`.
    #[error("malformed append request: {0}")]
    MalformedAppend(String),
}

pub type Result<T> = std::result::Result<T, PeerError>;
