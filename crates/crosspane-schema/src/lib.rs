//! Handler schema store and capability catalog.
//!
//! A peer's schema is its mapping from message-type names to handlers. The
//! [`SchemaStore`] keeps that mapping in insertion order so that schema
//! broadcasts enumerate entries the way they were registered. The
//! [`HandlerCatalog`] is the trust boundary for handler installation: a
//! portable handler body resolves to a local callable only through a
//! pre-agreed capability name, never by constructing code from text.

pub mod catalog;
pub mod error;
pub mod store;

pub use catalog::{
    HandlerCatalog, CAP_LOG_CONTENT, CAP_LOG_MESSAGE, CAP_WARN_CONTENT,
};
pub use error::{Result, SchemaError};
pub use store::{encode_schema, CallableHandler, Handler, SchemaEntry, SchemaStore};
