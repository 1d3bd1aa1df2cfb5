use std::fmt;

use crosspane_transport::WILDCARD_ORIGIN;

/// Trust rule applied to every inbound event: accept any origin, or exactly
/// one. The same string is handed to `post` as the target-origin
/// restriction on outbound traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept messages from any origin (`*`).
    Any,
    /// Accept messages only from this exact origin.
    Exact(String),
}

impl OriginPolicy {
    /// Parse a configuration string: `*` is the wildcard, anything else is
    /// an exact origin.
    pub fn parse(text: &str) -> Self {
        if text == WILDCARD_ORIGIN {
            Self::Any
        } else {
            Self::Exact(text.to_string())
        }
    }

    pub fn exact(origin: impl Into<String>) -> Self {
        Self::Exact(origin.into())
    }

    /// Whether an inbound origin passes this policy.
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(trusted) => trusted == origin,
        }
    }

    /// The target-origin string used on outbound posts.
    pub fn as_target(&self) -> &str {
        match self {
            Self::Any => WILDCARD_ORIGIN,
            Self::Exact(origin) => origin,
        }
    }
}

impl fmt::Display for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_target())
    }
}
