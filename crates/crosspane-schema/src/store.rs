use std::fmt;
use std::sync::Arc;

use crosspane_codec::{encode_handler, HandlerSource, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered handler: a local callable with its portable source, or an
/// arbitrary data value kept as a placeholder.
#[derive(Clone)]
pub enum Handler {
    Callable(CallableHandler),
    Value(Value),
}

impl Handler {
    pub fn is_callable(&self) -> bool {
        matches!(self, Handler::Callable(_))
    }

    pub fn as_callable(&self) -> Option<&CallableHandler> {
        match self {
            Handler::Callable(callable) => Some(callable),
            Handler::Value(_) => None,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Callable(callable) => f.debug_tuple("Callable").field(callable).finish(),
            Handler::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// A callable handler paired with the portable source it travels as.
///
/// Invocation receives the full message, wrapper included, so handlers can
/// inspect the type tag.
#[derive(Clone)]
pub struct CallableHandler {
    source: HandlerSource,
    func: Arc<dyn Fn(&Message) + Send + Sync>,
}

impl CallableHandler {
    pub fn new(
        source: HandlerSource,
        func: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            func: Arc::new(func),
        }
    }

    pub(crate) fn from_shared(
        source: HandlerSource,
        func: Arc<dyn Fn(&Message) + Send + Sync>,
    ) -> Self {
        Self { source, func }
    }

    /// The portable representation this handler is announced as.
    pub fn source(&self) -> &HandlerSource {
        &self.source
    }

    /// Run the handler. Panics inside the handler are not caught here.
    pub fn invoke(&self, message: &Message) {
        (self.func)(message)
    }
}

impl fmt::Debug for CallableHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableHandler")
            .field("source", &self.source.to_string())
            .finish()
    }
}

/// Insertion-ordered mapping from message-type name to handler.
///
/// Overwrite keeps the original position: last write wins on the value,
/// first write wins on iteration order. Enumeration order is part of the
/// schema-broadcast contract, so the store is a vector of pairs rather
/// than a hash map.
#[derive(Debug, Default)]
pub struct SchemaStore {
    entries: Vec<(String, Handler)>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the handler for a message type (exact match).
    pub fn get(&self, kind: &str) -> Option<&Handler> {
        self.entries
            .iter()
            .find(|(name, _)| name == kind)
            .map(|(_, handler)| handler)
    }

    /// Insert or overwrite the entry for `kind`.
    pub fn set(&mut self, kind: impl Into<String>, handler: Handler) {
        let kind = kind.into();
        match self.entries.iter_mut().find(|(name, _)| *name == kind) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((kind, handler)),
        }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.entries
            .iter()
            .map(|(name, handler)| (name.as_str(), handler))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One element of a `schema` announcement: the message type and the
/// handler's transmissible form.
///
/// Callable handlers travel as their portable source text; value handlers
/// travel as the value itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaEntry {
    #[serde(rename = "messageType")]
    pub message_type: String,
    pub function: Value,
}

/// Encode the whole store for a `schema` broadcast, in insertion order.
pub fn encode_schema(store: &SchemaStore) -> Vec<SchemaEntry> {
    store
        .entries()
        .map(|(kind, handler)| SchemaEntry {
            message_type: kind.to_string(),
            function: match handler {
                Handler::Callable(callable) => {
                    Value::String(encode_handler(callable.source()))
                }
                Handler::Value(value) => value.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    fn noop(source_body: &str) -> Handler {
        Handler::Callable(CallableHandler::new(
            HandlerSource::new("msg", source_body),
            |_| {},
        ))
    }

    #[test]
    fn get_and_set() {
        let mut store = SchemaStore::new();
        assert!(store.get("ping").is_none());

        store.set("ping", noop("log-content"));
        assert!(store.get("ping").is_some());
        assert!(store.contains("ping"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut store = SchemaStore::new();
        store.set("first", noop("a"));
        store.set("second", noop("b"));
        store.set("first", Handler::Value(json!("replaced")));

        let order: Vec<&str> = store.entries().map(|(kind, _)| kind).collect();
        assert_eq!(order, vec!["first", "second"]);
        assert!(matches!(store.get("first"), Some(Handler::Value(_))));
    }

    #[test]
    fn entries_in_insertion_order() {
        let mut store = SchemaStore::new();
        store.set("c", noop("x"));
        store.set("a", noop("y"));
        store.set("b", noop("z"));

        let order: Vec<&str> = store.entries().map(|(kind, _)| kind).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn invoke_passes_full_message() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let handler = CallableHandler::new(HandlerSource::new("msg", "count"), move |message| {
            assert_eq!(message.kind(), "ping");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        handler.invoke(&Message::new("ping", "hello"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn encode_schema_mixes_callables_and_values() {
        let mut store = SchemaStore::new();
        store.set("ping", noop("log-content"));
        store.set("limits", Handler::Value(json!({"max": 5})));

        let entries = encode_schema(&store);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message_type, "ping");
        assert_eq!(entries[0].function, json!("(msg){ log-content }"));
        assert_eq!(entries[1].message_type, "limits");
        assert_eq!(entries[1].function, json!({"max": 5}));
    }

    #[test]
    fn schema_entry_wire_shape() {
        let entry = SchemaEntry {
            message_type: "ping".to_string(),
            function: json!("(msg){ log-content }"),
        };
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            text,
            r#"{"messageType":"ping","function":"(msg){ log-content }"}"#
        );
    }
}
