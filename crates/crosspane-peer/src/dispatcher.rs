use crosspane_codec::{decode_message, encode_message, Message};
use crosspane_schema::{encode_schema, Handler, HandlerCatalog, SchemaStore};
use crosspane_transport::{InboundEvent, MessagePort};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::control;
use crate::error::{PeerError, Result};
use crate::origin::OriginPolicy;
use crate::peer::Registration;

/// Outcome of one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Origin failed the trust policy; a denial was posted back at the
    /// sender through the event's reply port.
    Rejected,
    /// Blank or undecodable payload; a local warning was logged, no reply.
    Blank,
    /// `log`/`warning`/`error` content routed to the local sink.
    Routed,
    /// A remote schema announcement was logged.
    SchemaAnnounced,
    /// `append` installed a handler and broadcast the updated schema.
    Appended(String),
    /// A registered handler ran for this message type.
    Invoked(String),
    /// Unknown message type; a warning was sent to the configured peer.
    Warned(String),
    /// Unknown message type that lowercases to `blank`; dropped silently.
    Ignored(String),
}

/// The inbound path: origin check, decode, route.
///
/// Owns the schema store, the capability catalog, and the handle to the
/// configured remote. Control types are matched before the store, so they
/// cannot be shadowed by user registrations.
pub struct Dispatcher {
    policy: OriginPolicy,
    target: Box<dyn MessagePort>,
    store: SchemaStore,
    catalog: HandlerCatalog,
}

impl Dispatcher {
    pub(crate) fn new(
        target: Box<dyn MessagePort>,
        policy: OriginPolicy,
        catalog: HandlerCatalog,
    ) -> Self {
        Self {
            policy,
            target,
            store: SchemaStore::new(),
            catalog,
        }
    }

    /// Process one inbound event through the five-outcome state machine.
    ///
    /// Handler panics are not caught; routing is this layer's job, handler
    /// fault isolation is the registrant's.
    pub fn dispatch(&mut self, event: InboundEvent) -> Result<Dispatch> {
        if !self.policy.allows(&event.origin) {
            let payload = encode_message(&control::permission_denied())?;
            event.reply.post(&payload, &event.origin)?;
            warn!(origin = %event.origin, "rejected message from untrusted origin");
            return Ok(Dispatch::Rejected);
        }

        let message = match event.payload.as_deref() {
            None => Message::blank(),
            Some(raw) => match decode_message(raw) {
                Ok(message) => message,
                Err(err) => {
                    warn!(error = %err, "inbound payload failed to decode");
                    Message::blank()
                }
            },
        };

        match message.kind() {
            control::CONTROL_LOG => {
                info!(content = %message.content_text(), "peer log");
                Ok(Dispatch::Routed)
            }
            control::CONTROL_WARNING => {
                warn!(content = %message.content_text(), "peer warning");
                Ok(Dispatch::Routed)
            }
            control::CONTROL_ERROR => {
                error!(content = %message.content_text(), "peer error");
                Ok(Dispatch::Routed)
            }
            control::CONTROL_SCHEMA => {
                info!(schema = %message.content(), "peer announced schema");
                Ok(Dispatch::SchemaAnnounced)
            }
            control::CONTROL_APPEND => self.append(&message),
            control::CONTROL_BLANK => {
                warn!("message was blank or improperly formatted");
                Ok(Dispatch::Blank)
            }
            _ => self.delegate(&message),
        }
    }

    /// Route a non-control message to its schema handler, or warn the
    /// configured peer that none is registered.
    fn delegate(&mut self, message: &Message) -> Result<Dispatch> {
        let kind = message.kind();

        if let Some(handler) = self.store.get(kind).and_then(Handler::as_callable) {
            handler.invoke(message);
            return Ok(Dispatch::Invoked(kind.to_string()));
        }

        // Lets schema traffic in mixed case pass silently, so announcements
        // can bounce between peers without warning storms.
        if kind.eq_ignore_ascii_case(control::CONTROL_BLANK) {
            return Ok(Dispatch::Ignored(kind.to_string()));
        }

        self.send(&control::unknown_type(kind))?;
        Ok(Dispatch::Warned(kind.to_string()))
    }

    /// Handle `append`: `[messageType, sourceOrValue]` installs an entry
    /// through the shared registration path, broadcast included.
    fn append(&mut self, message: &Message) -> Result<Dispatch> {
        let content = message.content();
        let parts = content
            .as_array()
            .filter(|parts| parts.len() == 2)
            .ok_or_else(|| {
                PeerError::MalformedAppend(format!(
                    "content must be [messageType, sourceOrValue], got {content}"
                ))
            })?;
        let kind = parts[0].as_str().ok_or_else(|| {
            PeerError::MalformedAppend(format!("message type must be a string, got {}", parts[0]))
        })?;

        let registration = match &parts[1] {
            Value::String(text) => Registration::Source(text.clone()),
            other => Registration::Value(other.clone()),
        };

        self.install(kind, registration)?;
        Ok(Dispatch::Appended(kind.to_string()))
    }

    /// Install an entry and broadcast the updated schema. Shared by
    /// `Peer::register_handler` and the `append` control type.
    pub(crate) fn install(&mut self, kind: &str, registration: Registration) -> Result<()> {
        let handler = self.materialize(registration)?;
        if control::is_reserved(kind) {
            debug!(kind, "registered a reserved message type; built-in dispatch still wins");
        }
        self.store.set(kind, handler);
        self.broadcast_schema()
    }

    /// Install without broadcasting. Used for the construction-time schema.
    pub(crate) fn install_silent(&mut self, kind: &str, registration: Registration) -> Result<()> {
        let handler = self.materialize(registration)?;
        self.store.set(kind, handler);
        Ok(())
    }

    fn materialize(&self, registration: Registration) -> Result<Handler> {
        match registration {
            Registration::Callable(callable) => Ok(Handler::Callable(callable)),
            Registration::Value(value) => Ok(Handler::Value(value)),
            Registration::Source(text) => {
                Ok(Handler::Callable(self.catalog.resolve_text(&text)?))
            }
        }
    }

    fn broadcast_schema(&self) -> Result<()> {
        let entries = encode_schema(&self.store);
        self.send(&control::schema_announcement(&entries)?)
    }

    /// Encode and post to the configured remote, restricted to the policy's
    /// target origin. Fire-and-forget.
    pub(crate) fn send(&self, message: &Message) -> Result<()> {
        let payload = encode_message(message)?;
        self.target.post(&payload, self.policy.as_target())?;
        Ok(())
    }

    pub(crate) fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub(crate) fn catalog(&self) -> &HandlerCatalog {
        &self.catalog
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut HandlerCatalog {
        &mut self.catalog
    }

    pub(crate) fn policy(&self) -> &OriginPolicy {
        &self.policy
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .field("schema_len", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crosspane_codec::HandlerSource;
    use crosspane_schema::{CallableHandler, SchemaError};
    use crosspane_transport::{EventSource, LocalContext, WILDCARD_ORIGIN};
    use serde_json::json;

    use super::*;

    const PARENT: &str = "https://app.example";
    const PANE: &str = "https://pane.example";

    /// Dispatcher for the parent context, targeting the pane, plus the two
    /// local contexts for queue inspection.
    fn fixture(policy: OriginPolicy) -> (Dispatcher, LocalContext, LocalContext) {
        let (parent, pane) = LocalContext::pair(PARENT, PANE);
        let dispatcher = Dispatcher::new(
            Box::new(parent.port_to(&pane)),
            policy,
            HandlerCatalog::new(),
        );
        (dispatcher, parent, pane)
    }

    fn event_from(sender: &LocalContext, receiver: &mut LocalContext, payload: &str) -> InboundEvent {
        sender
            .port_to(receiver)
            .post(payload, WILDCARD_ORIGIN)
            .expect("post should deliver");
        receiver
            .try_next()
            .expect("queue should be readable")
            .expect("event should be queued")
    }

    fn next_message(context: &mut LocalContext) -> Option<Message> {
        context
            .try_next()
            .expect("queue should be readable")
            .map(|event| decode_message(event.payload.as_deref().unwrap_or("")).unwrap())
    }

    fn counting_handler(body: &str) -> (Registration, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let registration = Registration::Callable(CallableHandler::new(
            HandlerSource::new("msg", body),
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        ));
        (registration, hits)
    }

    #[test]
    fn untrusted_origin_gets_exactly_one_denial_reply() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::exact(PANE));
        let mut intruder = LocalContext::new("https://evil.example");

        let event = event_from(&intruder, &mut parent, r#"{"ping":"hi"}"#);
        assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Rejected);

        let denial = next_message(&mut intruder).expect("sender should get the denial");
        assert_eq!(denial.kind(), "error");
        assert!(denial.content_text().contains("permission"));
        assert!(next_message(&mut intruder).is_none(), "exactly one reply");
        assert!(next_message(&mut pane).is_none(), "target gets nothing");
        assert!(dispatcher.store().is_empty(), "no schema entry is created");
    }

    #[test]
    fn trusted_origin_passes_exact_policy() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::exact(PANE));
        let sender = LocalContext::new(PANE);

        let event = event_from(&sender, &mut parent, r#"{"log":"hello"}"#);
        assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Routed);
        assert!(next_message(&mut pane).is_none());
    }

    #[test]
    fn empty_and_absent_payloads_are_blank() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let event = event_from(&sender, &mut parent, "");
        assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Blank);

        let mut event = event_from(&sender, &mut parent, "x");
        event.payload = None;
        assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Blank);

        assert!(next_message(&mut pane).is_none(), "blank sends no reply");
    }

    #[test]
    fn malformed_payload_degrades_to_blank_without_reply() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        for payload in ["{broken", "42", r#"{"a":1,"b":2}"#] {
            let event = event_from(&sender, &mut parent, payload);
            assert_eq!(
                dispatcher.dispatch(event).unwrap(),
                Dispatch::Blank,
                "payload {payload:?}"
            );
        }
        assert!(next_message(&mut pane).is_none());
    }

    #[test]
    fn log_warning_error_route_locally() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        for kind in ["log", "warning", "error"] {
            let payload = encode_message(&Message::new(kind, "text")).unwrap();
            let event = event_from(&sender, &mut parent, &payload);
            assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Routed);
        }
        assert!(next_message(&mut pane).is_none());
    }

    #[test]
    fn schema_announcement_is_logged_not_merged() {
        let (mut dispatcher, mut parent, _pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let payload = encode_message(&Message::new(
            "schema",
            json!([{"messageType": "ping", "function": "(msg){ log-content }"}]),
        ))
        .unwrap();
        let event = event_from(&sender, &mut parent, &payload);

        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::SchemaAnnounced
        );
        assert!(
            dispatcher.store().is_empty(),
            "announcements are surfaced, never merged"
        );
    }

    #[test]
    fn append_installs_and_broadcasts() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let payload = encode_message(&control::append_request(
            "pong",
            "(msg){ log-content }",
        ))
        .unwrap();
        let event = event_from(&sender, &mut parent, &payload);

        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::Appended("pong".to_string())
        );
        assert!(dispatcher.store().contains("pong"));

        let broadcast = next_message(&mut pane).expect("schema broadcast should follow");
        assert_eq!(broadcast.kind(), "schema");
        assert_eq!(broadcast.content()[0]["messageType"], json!("pong"));
        assert!(next_message(&mut pane).is_none(), "exactly one broadcast");
    }

    #[test]
    fn appended_handler_is_invocable() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let payload = encode_message(&control::append_request(
            "pong",
            "(msg){ log-content }",
        ))
        .unwrap();
        let event = event_from(&sender, &mut parent, &payload);
        dispatcher.dispatch(event).unwrap();
        let _ = next_message(&mut pane); // drain the broadcast

        let event = event_from(&sender, &mut parent, r#"{"pong":"back"}"#);
        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::Invoked("pong".to_string())
        );
    }

    #[test]
    fn append_with_value_installs_placeholder() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let payload =
            encode_message(&control::append_request("limits", json!({"max": 5}))).unwrap();
        let event = event_from(&sender, &mut parent, &payload);
        dispatcher.dispatch(event).unwrap();

        assert!(matches!(
            dispatcher.store().get("limits"),
            Some(Handler::Value(_))
        ));
        assert_eq!(next_message(&mut pane).unwrap().kind(), "schema");
    }

    #[test]
    fn append_with_unknown_capability_errors() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let payload = encode_message(&control::append_request(
            "pong",
            "(msg){ no-such-capability }",
        ))
        .unwrap();
        let event = event_from(&sender, &mut parent, &payload);

        let result = dispatcher.dispatch(event);
        assert!(matches!(
            result,
            Err(PeerError::Schema(SchemaError::UnknownCapability(_)))
        ));
        assert!(!dispatcher.store().contains("pong"));
        assert!(next_message(&mut pane).is_none(), "no broadcast on failure");
    }

    #[test]
    fn append_with_bad_shape_errors() {
        let (mut dispatcher, mut parent, _pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        for content in [json!("not an array"), json!(["only-one"]), json!([1, "x"])] {
            let payload = encode_message(&Message::new("append", content)).unwrap();
            let event = event_from(&sender, &mut parent, &payload);
            assert!(matches!(
                dispatcher.dispatch(event),
                Err(PeerError::MalformedAppend(_))
            ));
        }
    }

    #[test]
    fn unknown_type_warns_the_configured_peer() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let event = event_from(&sender, &mut parent, r#"{"mystery":"?"}"#);
        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::Warned("mystery".to_string())
        );

        let warning = next_message(&mut pane).expect("warning should be sent");
        assert_eq!(warning.kind(), "warning");
        assert!(warning.content_text().contains("\"mystery\""));
        assert!(next_message(&mut pane).is_none(), "exactly one warning");
    }

    #[test]
    fn unknown_type_lowercasing_to_blank_is_ignored() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let event = event_from(&sender, &mut parent, r#"{"BLANK":""}"#);
        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::Ignored("BLANK".to_string())
        );
        assert!(next_message(&mut pane).is_none());
    }

    #[test]
    fn registered_handler_receives_full_message() {
        let (mut dispatcher, mut parent, _pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let seen = Arc::new(std::sync::Mutex::new(None));
        let sink = seen.clone();
        dispatcher
            .install_silent(
                "ping",
                Registration::Callable(CallableHandler::new(
                    HandlerSource::new("msg", "capture"),
                    move |message| {
                        *sink.lock().unwrap() = Some(message.clone());
                    },
                )),
            )
            .unwrap();

        let event = event_from(&sender, &mut parent, r#"{"ping":"hello"}"#);
        dispatcher.dispatch(event).unwrap();

        let received = seen.lock().unwrap().clone().expect("handler should run");
        assert_eq!(received.kind(), "ping");
        assert_eq!(received.content(), &json!("hello"));
    }

    #[test]
    fn reserved_names_cannot_be_shadowed() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        let (registration, hits) = counting_handler("shadow");
        dispatcher.install_silent("log", registration).unwrap();

        let event = event_from(&sender, &mut parent, r#"{"log":"hello"}"#);
        assert_eq!(dispatcher.dispatch(event).unwrap(), Dispatch::Routed);
        assert_eq!(hits.load(Ordering::SeqCst), 0, "built-in dispatch wins");
        assert!(next_message(&mut pane).is_none());
    }

    #[test]
    fn value_entry_is_a_placeholder_not_a_handler() {
        let (mut dispatcher, mut parent, mut pane) = fixture(OriginPolicy::Any);
        let sender = LocalContext::new(PANE);

        dispatcher
            .install_silent("limits", Registration::Value(json!({"max": 5})))
            .unwrap();

        let event = event_from(&sender, &mut parent, r#"{"limits":"check"}"#);
        assert_eq!(
            dispatcher.dispatch(event).unwrap(),
            Dispatch::Warned("limits".to_string())
        );
        assert_eq!(next_message(&mut pane).unwrap().kind(), "warning");
    }
}
