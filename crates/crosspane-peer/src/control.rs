use crosspane_codec::{CodecError, Message};
use crosspane_schema::SchemaEntry;
use serde_json::{json, Value};

/// Reserved message type: route content to the info sink.
pub const CONTROL_LOG: &str = "log";
/// Reserved message type: route content to the warning sink.
pub const CONTROL_WARNING: &str = "warning";
/// Reserved message type: route content to the error sink.
pub const CONTROL_ERROR: &str = "error";
/// Reserved message type: a peer announcing its full schema.
pub const CONTROL_SCHEMA: &str = "schema";
/// Reserved message type: install a handler on the receiving peer.
pub const CONTROL_APPEND: &str = "append";
/// Reserved message type: the empty/malformed-payload sentinel.
pub const CONTROL_BLANK: &str = crosspane_codec::BLANK;

/// Whether `kind` is one of the reserved control types. Control dispatch is
/// checked before the schema store, so user entries under these names never
/// take effect.
pub fn is_reserved(kind: &str) -> bool {
    matches!(
        kind,
        CONTROL_LOG
            | CONTROL_WARNING
            | CONTROL_ERROR
            | CONTROL_SCHEMA
            | CONTROL_APPEND
            | CONTROL_BLANK
    )
}

/// Denial replied at a sender that failed the origin policy.
pub fn permission_denied() -> Message {
    Message::new(
        CONTROL_ERROR,
        "you do not have permission to post to this context",
    )
}

/// Warning sent to the configured peer when no handler matches `kind`.
pub fn unknown_type(kind: &str) -> Message {
    Message::new(
        CONTROL_WARNING,
        format!("no handler is registered for \"{kind}\"; send an append message to register one"),
    )
}

/// Full-store announcement, broadcast after every registration.
pub fn schema_announcement(entries: &[SchemaEntry]) -> Result<Message, CodecError> {
    let content = serde_json::to_value(entries).map_err(CodecError::Parse)?;
    Ok(Message::new(CONTROL_SCHEMA, content))
}

/// Ask the remote peer to install a handler: `[kind, sourceOrValue]`.
pub fn append_request(kind: &str, function: impl Into<Value>) -> Message {
    Message::new(CONTROL_APPEND, json!([kind, function.into()]))
}
