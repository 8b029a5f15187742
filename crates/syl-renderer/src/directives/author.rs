//! Author credits (`author`).

use crate::directive::{
    ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveSpec,
    Invocation,
};
use crate::util::escape_content;

/// Default label before the author names.
pub const DEFAULT_AUTHOR_LABEL: &str = "Author(s)";

/// Handler for `author`.
#[derive(Clone, Debug)]
pub struct AuthorDirective {
    label: String,
}

impl AuthorDirective {
    /// Credits introduced by `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for AuthorDirective {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHOR_LABEL)
    }
}

impl Directive for AuthorDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec::new(0, 0, ContentRule::Required)
    }

    fn run(
        &self,
        invocation: &Invocation,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let authors = invocation
            .content
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(escape_content)
            .collect::<Vec<_>>()
            .join("<br>");

        Ok(DirectiveOutput::Html(format!(
            concat!(
                "<div class=\"author\" style=\"text-align: right;\">",
                "<div style=\"display: inline-block;\">",
                "<p><small>{} : {}</small></p>",
                "<hr style=\"margin-top: -5px;\">",
                "</div></div>",
            ),
            escape_content(&self.label),
            authors
        )))
    }
}
