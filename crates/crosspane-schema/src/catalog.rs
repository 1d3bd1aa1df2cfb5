use std::collections::HashMap;
use std::sync::Arc;

use crosspane_codec::{decode_handler, HandlerSource, Message};
use tracing::{info, warn};

use crate::error::{Result, SchemaError};
use crate::store::CallableHandler;

/// Capability: log the message content at info level.
pub const CAP_LOG_CONTENT: &str = "log-content";
/// Capability: log the message content at warn level.
pub const CAP_WARN_CONTENT: &str = "warn-content";
/// Capability: log the whole message, wrapper included.
pub const CAP_LOG_MESSAGE: &str = "log-message";

/// Registry of named capabilities a portable handler body may resolve to.
///
/// Handler text arriving from the remote peer is never turned into code.
/// Its body is looked up here by name, and only a capability both sides
/// agreed on beforehand produces a callable. An unknown body is a
/// [`SchemaError::UnknownCapability`].
pub struct HandlerCatalog {
    capabilities: HashMap<String, Arc<dyn Fn(&Message) + Send + Sync>>,
}

impl HandlerCatalog {
    /// Catalog preloaded with the built-in logging capabilities.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register(CAP_LOG_CONTENT, |message: &Message| {
            info!(kind = %message.kind(), content = %message.content_text(), "handled message");
        });
        catalog.register(CAP_WARN_CONTENT, |message: &Message| {
            warn!(kind = %message.kind(), content = %message.content_text(), "handled message");
        });
        catalog.register(CAP_LOG_MESSAGE, |message: &Message| {
            let rendered = serde_json::to_string(message)
                .unwrap_or_else(|_| format!("{{\"{}\":?}}", message.kind()));
            info!(message = %rendered, "handled message");
        });
        catalog
    }

    /// Catalog with no capabilities at all.
    pub fn empty() -> Self {
        Self {
            capabilities: HashMap::new(),
        }
    }

    /// Register (or replace) a capability under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&Message) + Send + Sync + 'static,
    ) {
        self.capabilities.insert(name.into(), Arc::new(func));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Registered capability names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.capabilities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a decoded handler source against the catalog.
    ///
    /// The body text (already whitespace-collapsed) is the capability key.
    pub fn resolve(&self, source: &HandlerSource) -> Result<CallableHandler> {
        let key = source.body().trim();
        let func = self
            .capabilities
            .get(key)
            .ok_or_else(|| SchemaError::UnknownCapability(key.to_string()))?;
        Ok(CallableHandler::from_shared(
            source.clone(),
            Arc::clone(func),
        ))
    }

    /// Decode portable handler text, then resolve it.
    pub fn resolve_text(&self, text: &str) -> Result<CallableHandler> {
        let source = decode_handler(text)?;
        self.resolve(&source)
    }
}

impl Default for HandlerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("capabilities", &self.names())
            .finish()
    }
}
