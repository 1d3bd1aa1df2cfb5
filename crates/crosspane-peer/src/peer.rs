use crosspane_codec::{HandlerSource, Message};
use crosspane_schema::{CallableHandler, HandlerCatalog, SchemaStore};
use crosspane_transport::{EventSource, InboundEvent, MessagePort};
use serde_json::Value;

use crate::dispatcher::{Dispatch, Dispatcher};
use crate::error::{PeerError, Result};
use crate::origin::OriginPolicy;

/// Input to handler registration.
#[derive(Debug)]
pub enum Registration {
    /// A local callable together with the portable source it is announced
    /// as.
    Callable(CallableHandler),
    /// An arbitrary data value stored as a placeholder entry.
    Value(Value),
    /// Portable source text `(params){ body }`, resolved through the
    /// peer's capability catalog before storing.
    Source(String),
}

impl Registration {
    pub fn callable(
        source: HandlerSource,
        func: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        Self::Callable(CallableHandler::new(source, func))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn source(text: impl Into<String>) -> Self {
        Self::Source(text.into())
    }
}

/// One endpoint of the two-context relationship.
///
/// Owns a schema store, a capability catalog, a handle to the remote
/// context, and an origin policy. The inbound listener is an explicit
/// resource: [`Peer::bind`] acquires an event source, [`Peer::unbind`]
/// releases it, and [`Peer::pump`] drains pending events one at a time.
pub struct Peer {
    dispatcher: Dispatcher,
    events: Option<Box<dyn EventSource>>,
}

impl Peer {
    /// A peer posting to `target`, trusting inbound traffic per `policy`,
    /// with the default capability catalog and an empty schema.
    pub fn new(target: Box<dyn MessagePort>, policy: OriginPolicy) -> Self {
        Self {
            dispatcher: Dispatcher::new(target, policy, HandlerCatalog::new()),
            events: None,
        }
    }

    /// Replace the capability catalog.
    pub fn with_catalog(mut self, catalog: HandlerCatalog) -> Self {
        *self.dispatcher.catalog_mut() = catalog;
        self
    }

    /// Install the construction-time schema. Unlike [`Peer::register_handler`],
    /// this does not broadcast.
    pub fn with_schema(
        mut self,
        entries: impl IntoIterator<Item = (String, Registration)>,
    ) -> Result<Self> {
        for (kind, registration) in entries {
            self.dispatcher.install_silent(&kind, registration)?;
        }
        Ok(self)
    }

    /// Encode `message` and post it to the configured remote. No
    /// acknowledgment, no queueing; delivery is the transport's contract.
    pub fn send(&self, message: &Message) -> Result<()> {
        self.dispatcher.send(message)
    }

    /// Register (or overwrite) a handler, then broadcast one `schema`
    /// message enumerating the full store to the remote peer.
    pub fn register_handler(&mut self, kind: &str, registration: Registration) -> Result<()> {
        self.dispatcher.install(kind, registration)
    }

    /// Acquire the inbound listener. Fails if one is already bound.
    pub fn bind(&mut self, events: Box<dyn EventSource>) -> Result<()> {
        if self.events.is_some() {
            return Err(PeerError::AlreadyBound);
        }
        self.events = Some(events);
        Ok(())
    }

    /// Release the inbound listener, returning it for reuse or teardown.
    pub fn unbind(&mut self) -> Option<Box<dyn EventSource>> {
        self.events.take()
    }

    pub fn is_bound(&self) -> bool {
        self.events.is_some()
    }

    /// Drain every pending event from the bound source, in delivery order.
    pub fn pump(&mut self) -> Result<Vec<Dispatch>> {
        let mut outcomes = Vec::new();
        loop {
            let event = match self.events.as_mut() {
                Some(source) => source.try_next()?,
                None => return Err(PeerError::NotBound),
            };
            match event {
                Some(event) => outcomes.push(self.dispatcher.dispatch(event)?),
                None => return Ok(outcomes),
            }
        }
    }

    /// Process a single inbound event.
    pub fn dispatch(&mut self, event: InboundEvent) -> Result<Dispatch> {
        self.dispatcher.dispatch(event)
    }

    /// The local schema store.
    pub fn schema(&self) -> &SchemaStore {
        self.dispatcher.store()
    }

    /// The local capability catalog.
    pub fn catalog(&self) -> &HandlerCatalog {
        self.dispatcher.catalog()
    }

    /// Register capabilities after construction.
    pub fn catalog_mut(&mut self) -> &mut HandlerCatalog {
        self.dispatcher.catalog_mut()
    }

    /// The configured origin policy.
    pub fn policy(&self) -> &OriginPolicy {
        self.dispatcher.policy()
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("dispatcher", &self.dispatcher)
            .field("bound", &self.events.is_some())
            .finish()
    }
}
