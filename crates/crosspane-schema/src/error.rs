/// Errors that can occur while resolving or installing handlers.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The handler body named a capability the local catalog does not have.
    #[error("no capability registered for handler body '{0}'")]
    UnknownCapability(String),

    /// The portable handler text could not be decoded.
    #[error("handler source error: {0}")]
    Source(#[from] crosspane_codec::CodecError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
