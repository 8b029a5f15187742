//! Bordered answer boxes (`framed`).

use crate::directive::{
    ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveSpec,
    Invocation,
};
use crate::util::escape_content;

use super::parse_count;

/// Handler for `framed`.
///
/// `.. framed:: N` prints its content followed by exactly `N` newlines.
#[derive(Clone, Copy, Debug, Default)]
pub struct FramedDirective;

impl Directive for FramedDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec::new(1, 0, ContentRule::Optional)
    }

    fn run(
        &self,
        invocation: &Invocation,
        _ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let blank_lines = parse_count(invocation.argument(0).unwrap_or_default(), "blank line count")?;
        Ok(DirectiveOutput::Html(format!(
            "<pre class=\"framed\" style=\"border: 1px solid #999; padding: 10px;\">{}{}</pre>",
            escape_content(&invocation.content_text()),
            "\n".repeat(blank_lines)
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::RenderContext;

    fn run(argument: &str, content: &[&str]) -> Result<String, DirectiveError> {
        let render = RenderContext::print(None);
        let ctx = DirectiveContext {
            source_path: Path::new("page.md"),
            line: 1,
            render: &render,
            render_nested: &|text, _| Ok(text.to_owned()),
        };
        let invocation = Invocation {
            name: "framed".to_owned(),
            arguments: vec![argument.to_owned()],
            content: content.iter().map(|s| (*s).to_owned()).collect(),
            ..Default::default()
        };
        FramedDirective
            .run(&invocation, &ctx)
            .map(DirectiveOutput::into_string)
    }

    const OPEN: &str = "<pre class=\"framed\" style=\"border: 1px solid #999; padding: 10px;\">";

    #[test]
    fn test_content_with_padding() {
        assert_eq!(
            run("2", &["a < b"]).unwrap(),
            format!("{OPEN}a &lt; b\n\n</pre>")
        );
    }

    #[test]
    fn test_empty_content_exact_padding() {
        assert_eq!(run("3", &[]).unwrap(), format!("{OPEN}\n\n\n</pre>"));
    }

    #[test]
    fn test_zero_padding_is_legal() {
        assert_eq!(run("0", &[]).unwrap(), format!("{OPEN}</pre>"));
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = run("-2", &[]).unwrap_err();

        assert!(matches!(err, DirectiveError::Definition(_)));
    }
}
