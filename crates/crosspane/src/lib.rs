//! Typed message passing between parent and embedded pane contexts.
//!
//! crosspane is a minimal RPC/pub-sub layer over an origin-scoped,
//! string-only message channel: each side registers named handlers and the
//! registrations propagate to the remote peer, so both sides converge on a
//! shared schema.
//!
//! # Crate Structure
//!
//! - [`transport`] — Message-port boundary and the in-process context pair
//! - [`codec`] — Single-key message envelope and portable handler encoding
//! - [`schema`] — Ordered handler store and the capability catalog
//! - [`peer`] — Peer endpoints, dispatcher, and origin trust enforcement

/// Re-export transport types.
pub mod transport {
    pub use crosspane_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use crosspane_codec::*;
}

/// Re-export schema types.
pub mod schema {
    pub use crosspane_schema::*;
}

/// Re-export peer types.
pub mod peer {
    pub use crosspane_peer::*;
}
