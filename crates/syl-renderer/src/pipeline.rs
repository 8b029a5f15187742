//! Page rendering pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pulldown_cmark::{Options, Parser, html};

use crate::directive::DirectiveRegistry;
use crate::directive::processor::DirectiveProcessor;
use crate::util::escape_template_syntax;
use crate::RenderContext;

/// Default maximum depth of nested directive content.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 10;

/// Rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Directive is unknown, malformed, or references something missing.
    #[error("{}:{line}: directive '{directive}': {message}", file.display())]
    Directive {
        file: PathBuf,
        line: usize,
        directive: String,
        message: String,
    },
    /// Nested directive content exceeds the configured depth.
    #[error("{}:{line}: directive nesting deeper than {max} levels", file.display())]
    NestingTooDeep {
        file: PathBuf,
        line: usize,
        max: usize,
    },
}

/// Rendered page body.
///
/// HTML in which author text is inert, plus second-stage template source
/// emitted by directives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    /// Fragment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the fragment text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Markdown renderer with directive support.
///
/// Holds no per-request state: the same inputs always produce the same
/// fragment.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use std::sync::Arc;
/// use syl_renderer::{RenderContext, RenderPipeline};
/// use syl_renderer::directive::DirectiveRegistry;
///
/// let pipeline = RenderPipeline::new(Arc::new(DirectiveRegistry::default()));
/// let fragment = pipeline
///     .render_page("# Hello", Path::new("hello.md"), &RenderContext::default())
///     .unwrap();
///
/// assert_eq!(fragment.as_str(), "<h1>Hello</h1>\n");
/// ```
#[derive(Clone, Debug)]
pub struct RenderPipeline {
    registry: Arc<DirectiveRegistry>,
    max_nesting_depth: usize,
}

impl RenderPipeline {
    /// Create a pipeline over `registry`.
    #[must_use]
    pub fn new(registry: Arc<DirectiveRegistry>) -> Self {
        Self {
            registry,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Registered directives.
    #[must_use]
    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Render one page.
    ///
    /// `source_path` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for unknown or malformed directives, references
    /// that cannot be resolved, and excessive nesting.
    pub fn render_page(
        &self,
        raw: &str,
        source_path: &Path,
        ctx: &RenderContext,
    ) -> Result<Fragment, RenderError> {
        self.render_markup(raw, source_path, ctx, 0, 1).map(Fragment)
    }

    fn render_markup(
        &self,
        text: &str,
        source_path: &Path,
        ctx: &RenderContext,
        depth: usize,
        first_line: usize,
    ) -> Result<String, RenderError> {
        if depth > self.max_nesting_depth {
            return Err(RenderError::NestingTooDeep {
                file: source_path.to_path_buf(),
                line: first_line,
                max: self.max_nesting_depth,
            });
        }

        let nested = |text: &str, line: usize| {
            self.render_markup(text, source_path, ctx, depth + 1, line)
        };
        let processor = DirectiveProcessor {
            registry: &self.registry,
            source_path,
            render: ctx,
            render_nested: &nested,
            first_line,
        };
        let scanned = processor.process(text)?;

        let mut rendered = String::with_capacity(scanned.markdown.len() * 3 / 2);
        html::push_html(&mut rendered, Parser::new_ext(&scanned.markdown, parser_options()));

        let html = escape_template_syntax(&rendered);
        scanned
            .replacements
            .apply(&html)
            .map_err(|unplaced| processor.unplaced(unplaced))
    }
}

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}
