//! Directive processing context.

use std::path::Path;

use crate::{RenderContext, RenderError};

/// Callback rendering nested markup starting at a given source line.
pub type RenderNestedFn<'a> = dyn Fn(&str, usize) -> Result<String, RenderError> + 'a;

/// Context provided to directive handlers.
///
/// Created by the processor for each directive; gives handlers the source
/// location, the per-request [`RenderContext`] and access to the pipeline for
/// nested content.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use syl_renderer::RenderContext;
/// use syl_renderer::directive::DirectiveContext;
///
/// let render = RenderContext::default();
/// let ctx = DirectiveContext {
///     source_path: Path::new("basics/intro.md"),
///     line: 12,
///     render: &render,
///     render_nested: &|text, _line| Ok(format!("<p>{text}</p>")),
/// };
///
/// assert_eq!(ctx.render_nested("hi", 13).unwrap(), "<p>hi</p>");
/// ```
pub struct DirectiveContext<'a> {
    /// Page source being rendered.
    pub source_path: &'a Path,
    /// Line of the directive (1-indexed).
    pub line: usize,
    /// Current user and display mode.
    pub render: &'a RenderContext,
    /// Renders nested markup through the full pipeline.
    pub render_nested: &'a RenderNestedFn<'a>,
}

impl DirectiveContext<'_> {
    /// Render `text` as nested markup, reporting errors relative to `first_line`.
    ///
    /// # Errors
    ///
    /// Returns any error from the nested render, including exceeding the
    /// maximum nesting depth.
    pub fn render_nested(&self, text: &str, first_line: usize) -> Result<String, RenderError> {
        (self.render_nested)(text, first_line)
    }
}
