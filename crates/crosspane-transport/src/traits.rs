use crate::error::Result;

/// Target-origin wildcard: deliver regardless of the destination's origin.
pub const WILDCARD_ORIGIN: &str = "*";

/// A one-directional, fire-and-forget handle into a remote context.
///
/// `post` hands the payload to the destination's event queue. There is no
/// acknowledgment and no recall; once posted, delivery is the transport's
/// business. `target_origin` restricts delivery: the post is refused unless
/// it is [`WILDCARD_ORIGIN`] or matches the destination context's origin.
pub trait MessagePort {
    fn post(&self, payload: &str, target_origin: &str) -> Result<()>;

    /// Origin of the context this port delivers into, when the transport
    /// knows it. Diagnostics only; dispatch never trusts this.
    fn destination_origin(&self) -> Option<&str> {
        None
    }
}

/// A single delivered message event.
///
/// `origin` is stamped by the transport from the actual sender and is the
/// input to trust decisions. `reply` posts back at whoever raised the event,
/// which is not necessarily the configured peer.
pub struct InboundEvent {
    pub payload: Option<String>,
    pub origin: String,
    pub reply: Box<dyn MessagePort>,
}

impl std::fmt::Debug for InboundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundEvent")
            .field("payload", &self.payload)
            .field("origin", &self.origin)
            .finish()
    }
}

/// The inbound half of a context: a queue of delivered events.
///
/// Delivery order is the transport's contract. `try_next` never blocks;
/// an empty queue is `Ok(None)`.
pub trait EventSource {
    fn try_next(&mut self) -> Result<Option<InboundEvent>>;
}
