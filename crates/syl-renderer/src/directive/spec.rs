//! Directive signatures checked before a handler runs.

use super::Invocation;

/// Whether a directive accepts an indented content block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentRule {
    /// Content is rejected.
    Forbidden,
    /// Content may be empty.
    Optional,
    /// Content must contain at least one non-blank line.
    Required,
}

/// Shape of a directive: arguments, options and content.
///
/// # Example
///
/// ```
/// use syl_renderer::directive::{ContentRule, DirectiveSpec};
///
/// let spec = DirectiveSpec::new(1, 2, ContentRule::Optional);
/// assert_eq!(spec.max_arguments(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveSpec {
    /// Number of positional arguments that must be present.
    pub required_arguments: usize,
    /// Number of positional arguments that may follow the required ones.
    pub optional_arguments: usize,
    /// Content block rule.
    pub content: ContentRule,
    /// Recognised `:name: value` options.
    pub options: &'static [&'static str],
}

impl DirectiveSpec {
    /// Create a spec without options.
    #[must_use]
    pub const fn new(required: usize, optional: usize, content: ContentRule) -> Self {
        Self {
            required_arguments: required,
            optional_arguments: optional,
            content,
            options: &[],
        }
    }

    /// Set the recognised options.
    #[must_use]
    pub const fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    /// Largest accepted argument count.
    #[must_use]
    pub const fn max_arguments(&self) -> usize {
        self.required_arguments + self.optional_arguments
    }

    /// Check an invocation against this spec.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violation found.
    pub fn check(&self, invocation: &Invocation) -> Result<(), String> {
        let count = invocation.arguments.len();
        if count < self.required_arguments {
            return Err(format!(
                "expected at least {} argument(s), got {count}",
                self.required_arguments
            ));
        }
        if count > self.max_arguments() {
            return Err(format!(
                "expected at most {} argument(s), got {count}",
                self.max_arguments()
            ));
        }

        if let Some(name) = invocation
            .options
            .keys()
            .find(|name| !self.options.contains(&name.as_str()))
        {
            return Err(format!("unknown option '{name}'"));
        }

        match self.content {
            ContentRule::Forbidden if !invocation.content.is_empty() => {
                Err("no content is permitted".to_owned())
            }
            ContentRule::Required if invocation.content.is_empty() => {
                Err("content block is required".to_owned())
            }
            _ => Ok(()),
        }
    }
}
