use serde_json::{Map, Value};

use crate::error::{CodecError, Result};
use crate::handler::{collapse, HandlerSource};
use crate::message::Message;

/// Serialize a message to its wire payload.
pub fn encode_message(message: &Message) -> Result<String> {
    serde_json::to_string(message).map_err(CodecError::Parse)
}

/// Parse a wire payload into a message.
///
/// An empty payload yields the blank sentinel. A present but malformed
/// payload is a [`CodecError::Parse`]; the dispatcher degrades that to the
/// blank case, since the remote peer cannot be asked to resend.
pub fn decode_message(payload: &str) -> Result<Message> {
    if payload.is_empty() {
        return Ok(Message::blank());
    }
    let object: Map<String, Value> = serde_json::from_str(payload)?;
    Message::from_object(object)
}

/// Render a handler source to its transport-safe single-line text.
pub fn encode_handler(source: &HandlerSource) -> String {
    source.to_string()
}

/// Split portable handler text back into parameter list and body.
///
/// The parameter list is the text between the first `(` and the first `)`
/// after it; the body is the text between the first `{` and the first `}`
/// after it.
pub fn decode_handler(text: &str) -> Result<HandlerSource> {
    let text = collapse(text);

    let params = between(&text, '(', ')')
        .ok_or_else(|| CodecError::MalformedHandler("missing parameter list".to_string()))?;
    let body = between(&text, '{', '}')
        .ok_or_else(|| CodecError::MalformedHandler("missing body".to_string()))?;

    Ok(HandlerSource::new(params, body))
}

fn between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)? + open.len_utf8();
    let rest = &text[start..];
    let end = rest.find(close)?;
    Some(&rest[..end])
}
