//! Content visible to teachers only (`teacher`).

use crate::directive::{
    ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveSpec,
    Invocation,
};
use crate::ADMIN_ROLE;

/// Handler for `teacher`.
///
/// The content is rendered like the rest of the page and wrapped in a
/// second-stage condition on the viewer's role; the pipeline itself never
/// decides who may see it.
#[derive(Clone, Copy, Debug, Default)]
pub struct GateDirective;

impl Directive for GateDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec::new(0, 0, ContentRule::Optional)
    }

    fn run(
        &self,
        invocation: &Invocation,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        if invocation.content.is_empty() {
            return Ok(DirectiveOutput::Empty);
        }

        let inner = ctx.render_nested(&invocation.content_text(), invocation.content_line)?;
        Ok(DirectiveOutput::Html(format!(
            "{{% if logged_in and logged_in.right == \"{ADMIN_ROLE}\" %}}\n{inner}{{% endif %}}"
        )))
    }
}
