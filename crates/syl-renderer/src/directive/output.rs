//! Directive output types.

/// Output from a directive handler.
///
/// Fragments are spliced into the rendered page verbatim, so handlers escape
/// any author text they embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutput {
    /// HTML or second-stage template source.
    Html(String),
    /// Nothing is emitted.
    Empty,
}

impl DirectiveOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    /// Fragment text, empty for [`Empty`](Self::Empty).
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Html(html) => html,
            Self::Empty => String::new(),
        }
    }
}
