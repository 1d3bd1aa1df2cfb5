use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{CodecError, Result};

/// Message type of the blank sentinel, produced for empty or malformed
/// payloads.
pub const BLANK: &str = "blank";

/// The unit of exchange: a single-key mapping from message type to content.
///
/// The type tag is the map key itself. Content is any serializable value;
/// handlers receive the whole message so they can inspect the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    kind: String,
    content: Value,
}

impl Message {
    /// Build a message from a type tag and content.
    pub fn new(kind: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
        }
    }

    /// The sentinel for empty or undecodable payloads: `{ "blank": "" }`.
    pub fn blank() -> Self {
        Self::new(BLANK, "")
    }

    /// The message type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The message content.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consume the message, keeping only the content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// True for the blank sentinel (exact tag match).
    pub fn is_blank(&self) -> bool {
        self.kind == BLANK
    }

    /// Content rendered for log output: strings verbatim, everything else
    /// as JSON text.
    pub fn content_text(&self) -> std::borrow::Cow<'_, str> {
        match &self.content {
            Value::String(text) => std::borrow::Cow::Borrowed(text),
            other => std::borrow::Cow::Owned(other.to_string()),
        }
    }

    /// Build a message from an already-parsed JSON object, enforcing the
    /// single-key invariant.
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self> {
        if object.len() != 1 {
            return Err(CodecError::NotSingleKey {
                count: object.len(),
            });
        }
        let kind = object.keys().next().cloned().unwrap_or_default();
        let content = object.remove(&kind).unwrap_or(Value::Null);
        Ok(Self { kind, content })
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.kind, &self.content)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct MessageVisitor;

        impl<'de> Visitor<'de> for MessageVisitor {
            type Value = Message;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object with exactly one key")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Message, A::Error> {
                let (kind, content): (String, Value) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if access.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom(
                        "message must contain exactly one top-level key",
                    ));
                }
                Ok(Message { kind, content })
            }
        }

        deserializer.deserialize_map(MessageVisitor)
    }
}
