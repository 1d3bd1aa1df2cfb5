use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{EventSource, InboundEvent, MessagePort, WILDCARD_ORIGIN};

/// In-process transport: two contexts in one process, wired by channels.
///
/// Each [`LocalContext`] owns an origin string and an event queue. A
/// [`LocalPort`] obtained from [`LocalContext::port_to`] delivers into the
/// other context, stamping each event with the sending context's origin and
/// a reply port pointed back at it.
pub struct LocalContext {
    inbox: Arc<Inbox>,
    rx: Receiver<Delivery>,
}

struct Inbox {
    origin: String,
    tx: Sender<Delivery>,
}

struct Delivery {
    payload: String,
    origin: String,
    reply: LocalPort,
}

impl LocalContext {
    /// Create a context with the given origin.
    pub fn new(origin: impl Into<String>) -> Self {
        let (tx, rx) = channel();
        Self {
            inbox: Arc::new(Inbox {
                origin: origin.into(),
                tx,
            }),
            rx,
        }
    }

    /// Create two contexts, one per origin.
    pub fn pair(a_origin: &str, b_origin: &str) -> (Self, Self) {
        (Self::new(a_origin), Self::new(b_origin))
    }

    /// This context's origin.
    pub fn origin(&self) -> &str {
        &self.inbox.origin
    }

    /// A port that posts from this context into `destination`.
    pub fn port_to(&self, destination: &LocalContext) -> LocalPort {
        LocalPort {
            local: Arc::clone(&self.inbox),
            remote: Arc::clone(&destination.inbox),
        }
    }
}

impl EventSource for LocalContext {
    fn try_next(&mut self) -> Result<Option<InboundEvent>> {
        match self.rx.try_recv() {
            Ok(delivery) => Ok(Some(InboundEvent {
                payload: Some(delivery.payload),
                origin: delivery.origin,
                reply: Box::new(delivery.reply),
            })),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}

impl std::fmt::Debug for LocalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalContext")
            .field("origin", &self.inbox.origin)
            .finish()
    }
}

/// A port from one local context into another.
///
/// Cloning yields another handle to the same pair of contexts.
#[derive(Clone)]
pub struct LocalPort {
    local: Arc<Inbox>,
    remote: Arc<Inbox>,
}

impl LocalPort {
    /// The same wire, pointed the other way. Used as the reply port on
    /// delivered events.
    fn reversed(&self) -> LocalPort {
        LocalPort {
            local: Arc::clone(&self.remote),
            remote: Arc::clone(&self.local),
        }
    }
}

impl MessagePort for LocalPort {
    fn post(&self, payload: &str, target_origin: &str) -> Result<()> {
        if target_origin != WILDCARD_ORIGIN && target_origin != self.remote.origin {
            return Err(TransportError::Refused {
                target_origin: target_origin.to_string(),
                destination: self.remote.origin.clone(),
            });
        }

        debug!(
            from = %self.local.origin,
            to = %self.remote.origin,
            size = payload.len(),
            "posting payload"
        );

        self.remote
            .tx
            .send(Delivery {
                payload: payload.to_string(),
                origin: self.local.origin.clone(),
                reply: self.reversed(),
            })
            .map_err(|_| TransportError::Disconnected)
    }

    fn destination_origin(&self) -> Option<&str> {
        Some(&self.remote.origin)
    }
}

impl std::fmt::Debug for LocalPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPort")
            .field("from", &self.local.origin)
            .field("to", &self.remote.origin)
            .finish()
    }
}
