use std::fmt;

/// Portable handler representation: a parameter list and a body, as text.
///
/// The textual form is `(params){ body }` on a single line, with every
/// whitespace run (including line breaks) collapsed to one space. It is
/// embedded as an ordinary string value inside serialized messages, so it
/// crosses the boundary without further escaping. Captured environment does
/// not survive the trip; only the parameter list and body text do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSource {
    params: String,
    body: String,
}

impl HandlerSource {
    /// Build a source from parameter-list text and body text. Both are
    /// collapsed to the canonical single-line form.
    pub fn new(params: impl AsRef<str>, body: impl AsRef<str>) -> Self {
        Self {
            params: collapse(params.as_ref()),
            body: collapse(body.as_ref()),
        }
    }

    /// Parameter-list text, without the surrounding parentheses.
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Body text, without the surrounding braces.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for HandlerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){{ {} }}", self.params, self.body)
    }
}

/// Collapse every whitespace run (spaces, tabs, line breaks) to one space.
pub(crate) fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
