//! Peer endpoints for two-context messaging.
//!
//! This is the "just works" layer. A [`Peer`] owns one schema store, one
//! transport handle, and one origin policy; inbound events route through its
//! [`Dispatcher`] to built-in control handling or registered schema
//! handlers, and every registration is broadcast to the remote peer so both
//! sides converge on a shared schema.

pub mod control;
pub mod dispatcher;
pub mod error;
pub mod origin;
pub mod peer;

pub use control::{
    is_reserved, CONTROL_APPEND, CONTROL_BLANK, CONTROL_ERROR, CONTROL_LOG, CONTROL_SCHEMA,
    CONTROL_WARNING,
};
pub use dispatcher::{Dispatch, Dispatcher};
pub use error::{PeerError, Result};
pub use origin::OriginPolicy;
pub use peer::{Peer, Registration};
