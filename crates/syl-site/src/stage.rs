//! Second-stage template evaluation.
//!
//! Page fragments contain template source emitted by directives. The stage
//! evaluates it per viewer with this context:
//!
//! - `logged_in`: `{username, right}` or none
//! - `print_mode`: bool
//! - `chapter`: request path of the enclosing chapter, or none
//!
//! and these functions over the document tree:
//!
//! - `toc_top_level()`: root nodes
//! - `toc_children(path)`: children of the chapter at `path`
//! - `toc_chapter(path)`: the chapter at `path`, or none
//!
//! Nodes expose `title`, `request_path` and `is_chapter`. Titles and paths
//! are HTML-escaped once and marked safe, so paths keep their `/` inside
//! `href` attributes.

use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Value, context};
use syl_renderer::{RenderContext, escape_html};
use syl_toc::{DocumentNode, DocumentTree};

/// Template evaluation error.
#[derive(Debug, thiserror::Error)]
#[error("Template evaluation failed: {0}")]
pub struct StageError(#[from] minijinja::Error);

/// Template environment bound to one document tree.
pub struct Stage {
    env: Environment<'static>,
}

impl Stage {
    /// Create a stage whose tree functions query `tree`.
    #[must_use]
    pub fn new(tree: Arc<DocumentTree>) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        let top = Arc::clone(&tree);
        env.add_function("toc_top_level", move || -> Vec<Value> {
            top.get_top_level_content()
                .into_iter()
                .map(node_value)
                .collect()
        });

        let children = Arc::clone(&tree);
        env.add_function("toc_children", move |path: Value| -> Vec<Value> {
            path.as_str()
                .and_then(|p| children.get_chapter_from_path(p))
                .map(|chapter| {
                    children
                        .get_direct_content_of(chapter)
                        .into_iter()
                        .map(node_value)
                        .collect()
                })
                .unwrap_or_default()
        });

        env.add_function("toc_chapter", move |path: Value| -> Value {
            path.as_str()
                .and_then(|p| tree.get_chapter_from_path(p))
                .map_or(Value::from(()), node_value)
        });

        Self { env }
    }

    /// Evaluate `source` for the viewer described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the source is not a valid template or
    /// evaluation fails.
    pub fn render(
        &self,
        source: &str,
        ctx: &RenderContext,
        chapter: Option<&str>,
    ) -> Result<String, StageError> {
        let logged_in = ctx.identity.as_ref().map(|identity| {
            context! {
                username => identity.username,
                right => identity.role,
            }
        });
        let vars = context! {
            logged_in => logged_in,
            print_mode => ctx.print_mode,
            chapter => chapter,
        };
        Ok(self.env.render_str(source, vars)?)
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").finish_non_exhaustive()
    }
}

fn node_value(node: &DocumentNode) -> Value {
    context! {
        title => Value::from_safe_string(escape_html(node.title())),
        request_path => Value::from_safe_string(escape_html(node.request_path())),
        is_chapter => node.is_chapter(),
    }
}
