//! Origin-scoped message-port transport boundary.
//!
//! Models the string-only channel between two execution contexts (a parent
//! document and an embedded pane): a [`MessagePort`] carries opaque payloads
//! toward one destination, an [`EventSource`] yields inbound events carrying
//! the sender's origin and a reply port.
//!
//! This is the lowest layer of crosspane. Everything else builds on top of
//! the [`MessagePort`] and [`EventSource`] traits provided here. The
//! [`LocalContext`] pair is the in-process implementation used by the demo
//! command and the test suites.

pub mod error;
pub mod local;
pub mod traits;

pub use error::{Result, TransportError};
pub use local::{LocalContext, LocalPort};
pub use traits::{EventSource, InboundEvent, MessagePort, WILDCARD_ORIGIN};
