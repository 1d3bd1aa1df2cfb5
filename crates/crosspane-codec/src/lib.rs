//! Message envelope and portable handler encoding.
//!
//! This is the wire layer of crosspane. Every payload is the JSON text of a
//! single-key object:
//!
//! ```text
//! { "<messageType>": <content> }
//! ```
//!
//! The key doubles as the type tag; there is no separate type field. An
//! empty payload decodes to the [`Message::blank`] sentinel instead of
//! failing. Handlers cross the boundary as [`HandlerSource`], a one-line
//! textual form of their parameter list and body.

pub mod codec;
pub mod error;
pub mod handler;
pub mod message;

pub use codec::{decode_handler, decode_message, encode_handler, encode_message};
pub use error::{CodecError, Result};
pub use handler::HandlerSource;
pub use message::{Message, BLANK};
