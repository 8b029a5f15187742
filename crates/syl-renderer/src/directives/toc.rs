//! Table of contents (`table-of-contents`).
//!
//! The directive emits template source rather than a finished list: the
//! second stage walks the tree with `toc_top_level()`, `toc_children(path)`
//! and `toc_chapter(path)`, so `@chapter` can refer to a chapter that is only
//! known when the surrounding page is rendered.

use std::sync::Arc;

use syl_toc::DocumentTree;

use crate::directive::{
    ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveSpec,
    Invocation,
};

/// Argument meaning "the `chapter` variable of the page context".
pub const CURRENT_CHAPTER: &str = "@chapter";

/// Handler for `table-of-contents`.
#[derive(Clone, Debug)]
pub struct TocDirective {
    tree: Arc<DocumentTree>,
}

impl TocDirective {
    /// Table of contents over `tree`.
    #[must_use]
    pub fn new(tree: Arc<DocumentTree>) -> Self {
        Self { tree }
    }
}

impl Directive for TocDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec::new(0, 1, ContentRule::Forbidden)
    }

    fn run(
        &self,
        invocation: &Invocation,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let html = match invocation.argument(0) {
            None => whole_tree(),
            Some(CURRENT_CHAPTER) => chapter("chapter"),
            Some(path) => {
                let node = self.tree.get_chapter_from_path(path).ok_or_else(|| {
                    DirectiveError::Resolution(format!("no chapter at path '{path}'"))
                })?;
                chapter(&format!("\"{}\"", node.request_path()))
            }
        };
        Ok(DirectiveOutput::Html(html))
    }
}

fn whole_tree() -> String {
    format!(
        "<div class=\"table-of-contents\">\n<ul>\n{}</ul>\n</div>",
        node_loop("toc_top_level()")
    )
}

/// Chapter heading and list; `expr` evaluates to the chapter path.
fn chapter(expr: &str) -> String {
    format!(
        concat!(
            "<div class=\"table-of-contents\">\n",
            "{{% set toc_root = toc_chapter({expr}) %}}",
            "{{% if toc_root %}}\n",
            "<h3>{{{{ toc_root.title }}}}</h3>\n",
            "<ul>\n{body}</ul>\n",
            "{{% endif %}}\n",
            "</div>",
        ),
        expr = expr,
        body = node_loop("toc_children(toc_root.request_path)"),
    )
}

fn node_loop(items: &str) -> String {
    format!(
        concat!(
            "{{% for node in {items} recursive %}}\n",
            "<li style=\"list-style-type: none;\">",
            "<a href=\"/{{{{ node.request_path }}}}\">{{{{ node.title }}}}</a>",
            "{{% if node.is_chapter %}}\n<ul>\n{{{{ loop(toc_children(node.request_path)) }}}}</ul>\n{{% endif %}}",
            "</li>\n",
            "{{% endfor %}}\n",
        ),
        items = items,
    )
}
