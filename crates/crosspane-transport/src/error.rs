/// Errors that can occur in message-port transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The destination context is gone; the payload cannot be delivered.
    #[error("destination context closed")]
    Disconnected,

    /// The target origin restriction did not match the destination context.
    #[error("post refused: target origin '{target_origin}' does not match destination '{destination}'")]
    Refused {
        target_origin: String,
        destination: String,
    },
}

pub type Result<T> = std::result::Result<T, TransportError>;
