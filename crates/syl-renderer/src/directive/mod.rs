//! Pluggable directive API.
//!
//! Directives use reStructuredText-style block syntax inside markdown:
//!
//! ```text
//! .. name:: arg1 arg2
//!    :option: value
//!
//!    indented content
//! ```
//!
//! # Architecture
//!
//! Rendering is two-phase:
//!
//! 1. **Scanning**: each directive line outside code blocks is parsed into an
//!    [`Invocation`], checked against the handler's [`DirectiveSpec`], run, and
//!    replaced by a placeholder comment.
//! 2. **Splicing**: after pulldown-cmark renders the remaining markdown, the
//!    placeholders are swapped for the handler fragments in one pass.
//!
//! Handlers are registered by name in a [`DirectiveRegistry`] that is built
//! once and shared; they take `&self` and must be `Send + Sync`.

mod context;
mod error;
mod invocation;
mod output;
mod parser;
pub(crate) mod processor;
mod registry;
mod replacements;
mod spec;

pub use context::{DirectiveContext, RenderNestedFn};
pub use error::DirectiveError;
pub use invocation::Invocation;
pub use output::DirectiveOutput;
pub use registry::{DirectiveRegistry, DirectiveRegistryBuilder};
pub(crate) use replacements::Replacements;
pub use spec::{ContentRule, DirectiveSpec};

/// Handler for one or more directive names.
pub trait Directive: Send + Sync {
    /// Accepted arguments, options and content.
    fn spec(&self) -> DirectiveSpec;

    /// Produce the fragment for `invocation`.
    ///
    /// Called only for invocations that satisfy [`spec`](Self::spec).
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError`] for invalid argument values, unresolvable
    /// references, or failures while rendering nested content.
    fn run(
        &self,
        invocation: &Invocation,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError>;
}
