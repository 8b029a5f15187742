//! Line scanner that runs directives and leaves placeholders behind.

use std::path::Path;

use crate::code_blocks::CodeBlocks;
use crate::{RenderContext, RenderError};

use super::parser::{collect_block, parse_header};
use super::replacements::Unplaced;
use super::{
    DirectiveContext, DirectiveError, DirectiveRegistry, Invocation, RenderNestedFn,
    Replacements,
};

/// Deepest indent at which a placeholder still starts an HTML block.
const MAX_BLOCK_INDENT: &str = "   ";

/// Markdown with directives replaced by placeholders.
pub(crate) struct Scanned {
    pub markdown: String,
    pub replacements: Replacements,
}

/// Runs directives of one markup text in document order.
pub(crate) struct DirectiveProcessor<'a> {
    pub registry: &'a DirectiveRegistry,
    pub source_path: &'a Path,
    pub render: &'a RenderContext,
    pub render_nested: &'a RenderNestedFn<'a>,
    /// Source line of the first input line.
    pub first_line: usize,
}

impl DirectiveProcessor<'_> {
    /// Scan `input`, running every directive outside code blocks.
    pub(crate) fn process(&self, input: &str) -> Result<Scanned, RenderError> {
        let (lines, offsets) = split_lines(input);
        let code = CodeBlocks::scan(input);
        let mut markdown = String::with_capacity(input.len());
        let mut replacements = Replacements::for_source(input);

        let mut idx = 0;
        while idx < lines.len() {
            let line = lines[idx];

            let header = parse_header(line)
                .filter(|header| !code.contains(offsets[idx] + header.indent.len()));
            let Some(header) = header else {
                markdown.push_str(line);
                markdown.push('\n');
                idx += 1;
                continue;
            };

            let block = collect_block(&lines[idx + 1..], header.indent.len());
            let line_num = self.first_line + idx;
            let invocation = Invocation {
                name: header.name.to_owned(),
                arguments: header.arguments,
                options: block.options,
                content: block.content,
                line: line_num,
                content_line: line_num + block.content_offset,
            };

            let fragment = self.dispatch(&invocation)?;
            let placeholder = replacements.push(fragment, &invocation);

            // Placeholders must stand alone, indented less than code, to be
            // parsed as HTML blocks.
            if !markdown.is_empty() && !markdown.ends_with("\n\n") {
                markdown.push('\n');
            }
            markdown.push_str(block_indent(header.indent));
            markdown.push_str(&placeholder);
            markdown.push_str("\n\n");

            idx += 1 + block.consumed;
        }

        Ok(Scanned {
            markdown,
            replacements,
        })
    }

    /// Error for a directive whose output was lost while rendering markdown.
    pub(crate) fn unplaced(&self, unplaced: Unplaced) -> RenderError {
        RenderError::Directive {
            file: self.source_path.to_path_buf(),
            line: unplaced.line,
            directive: unplaced.directive,
            message: "output was lost while rendering the surrounding markdown".to_owned(),
        }
    }

    fn dispatch(&self, invocation: &Invocation) -> Result<String, RenderError> {
        let name = invocation.name.as_str();
        let (Some(handler), Some(spec)) = (self.registry.get(name), self.registry.spec(name))
        else {
            return Err(self.error(invocation, "unknown directive".to_owned()));
        };
        spec.check(invocation)
            .map_err(|message| self.error(invocation, message))?;

        tracing::debug!(
            directive = name,
            file = %self.source_path.display(),
            line = invocation.line,
            "Running directive"
        );

        let ctx = DirectiveContext {
            source_path: self.source_path,
            line: invocation.line,
            render: self.render,
            render_nested: self.render_nested,
        };
        match handler.run(invocation, &ctx) {
            Ok(output) => Ok(output.into_string()),
            Err(DirectiveError::Nested(err)) => Err(*err),
            Err(err) => Err(self.error(invocation, err.to_string())),
        }
    }

    fn error(&self, invocation: &Invocation, message: String) -> RenderError {
        RenderError::Directive {
            file: self.source_path.to_path_buf(),
            line: invocation.line,
            directive: invocation.name.clone(),
            message,
        }
    }
}

/// Lines of `input` without terminators, with the byte offset of each.
fn split_lines(input: &str) -> (Vec<&str>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut offsets = Vec::new();
    let mut offset = 0;
    for raw in input.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        lines.push(line.strip_suffix('\r').unwrap_or(line));
        offsets.push(offset);
        offset += raw.len();
    }
    (lines, offsets)
}

fn block_indent(indent: &str) -> &str {
    if indent.len() > MAX_BLOCK_INDENT.len() || indent.contains('\t') {
        MAX_BLOCK_INDENT
    } else {
        indent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{ContentRule, Directive, DirectiveOutput, DirectiveSpec};
    use pretty_assertions::assert_eq;

    /// Echoes its invocation so tests can inspect what the scanner saw.
    struct Echo;

    impl Directive for Echo {
        fn spec(&self) -> DirectiveSpec {
            DirectiveSpec::new(0, 3, ContentRule::Optional).with_options(&["opt"])
        }

        fn run(
            &self,
            invocation: &Invocation,
            ctx: &DirectiveContext<'_>,
        ) -> Result<DirectiveOutput, DirectiveError> {
            Ok(DirectiveOutput::html(format!(
                "[{}@{} args={:?} content={:?} from={}]",
                invocation.name,
                ctx.line,
                invocation.arguments,
                invocation.content,
                invocation.content_line
            )))
        }
    }

    fn scan(input: &str) -> Result<(String, Vec<String>), RenderError> {
        let registry = DirectiveRegistry::builder().register("echo", Echo).build();
        let render = RenderContext::default();
        let nested: &RenderNestedFn<'_> = &|text, _| Ok(text.to_owned());
        let processor = DirectiveProcessor {
            registry: &registry,
            source_path: Path::new("page.md"),
            render: &render,
            render_nested: nested,
            first_line: 1,
        };
        let scanned = processor.process(input)?;
        let html = scanned
            .replacements
            .apply(&scanned.markdown)
            .map_err(|unplaced| processor.unplaced(unplaced))?;
        Ok((scanned.markdown, html.lines().map(str::to_owned).collect()))
    }

    #[test]
    fn test_directive_replaced_by_placeholder() {
        let (markdown, _) = scan("Intro\n.. echo:: a b\n\n   body\n\nOutro").unwrap();

        assert_eq!(
            markdown,
            "Intro\n\n<!-- syl:fragment:0 -->\n\n\nOutro\n"
        );
    }

    #[test]
    fn test_invocation_fields() {
        let (_, lines) = scan("Intro\n\n.. echo:: a b\n\n   body\n   more\n").unwrap();

        assert_eq!(
            lines[2],
            r#"[echo@3 args=["a", "b"] content=["body", "more"] from=5]"#
        );
    }

    #[test]
    fn test_directives_in_code_untouched() {
        let input = "```\n.. echo:: a\n```\n.. unknown:: x\n";
        let registry = DirectiveRegistry::builder().build();
        let render = RenderContext::default();
        let processor = DirectiveProcessor {
            registry: &registry,
            source_path: Path::new("page.md"),
            render: &render,
            render_nested: &|text, _| Ok(text.to_owned()),
            first_line: 1,
        };

        let err = processor.process(input).err().unwrap();

        assert!(matches!(err, RenderError::Directive { line: 4, .. }));
        let scanned = processor.process("```\n.. echo:: a\n```\n").unwrap();
        assert_eq!(scanned.markdown, "```\n.. echo:: a\n```\n");
        let scanned = processor.process("Intro\n\n    .. echo:: a\n").unwrap();
        assert_eq!(scanned.markdown, "Intro\n\n    .. echo:: a\n");
        assert_eq!(scanned.replacements.len(), 0);
    }

    #[test]
    fn test_deep_indent_clamped_for_placeholder() {
        let (markdown, lines) = scan("Intro\n      .. echo:: a\n").unwrap();

        assert_eq!(markdown, "Intro\n\n   <!-- syl:fragment:0 -->\n\n");
        assert_eq!(lines[2], r#"   [echo@2 args=["a"] content=[] from=3]"#);
    }

    #[test]
    fn test_list_item_keeps_indent() {
        let (markdown, _) = scan("1. Step\n\n   .. echo:: a\n").unwrap();

        assert_eq!(markdown, "1. Step\n\n   <!-- syl:fragment:0 -->\n\n");
    }

    #[test]
    fn test_crlf_lines() {
        let (_, lines) = scan("Intro\r\n\r\n.. echo:: a\r\n\r\n   body\r\n").unwrap();

        assert_eq!(lines[2], r#"[echo@3 args=["a"] content=["body"] from=5]"#);
    }

    #[test]
    fn test_unknown_directive_reports_line() {
        let err = scan("a\nb\n.. nope:: 1\n").unwrap_err();

        assert_eq!(
            err.to_string(),
            "page.md:3: directive 'nope': unknown directive"
        );
    }

    #[test]
    fn test_spec_violation_reported_before_run() {
        let err = scan(".. echo:: 1 2 3 4\n").unwrap_err();

        assert!(err.to_string().contains("expected at most 3 argument(s), got 4"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = scan(".. echo::\n   :bogus: 1\n").unwrap_err();

        assert!(err.to_string().contains("unknown option 'bogus'"));
    }

    #[test]
    fn test_first_line_offsets_reported_lines() {
        let registry = DirectiveRegistry::builder().build();
        let render = RenderContext::default();
        let processor = DirectiveProcessor {
            registry: &registry,
            source_path: Path::new("page.md"),
            render: &render,
            render_nested: &|text, _| Ok(text.to_owned()),
            first_line: 10,
        };

        let err = processor.process("x\n.. missing::\n").err().unwrap();

        assert!(matches!(err, RenderError::Directive { line: 11, .. }));
    }

    #[test]
    fn test_consecutive_directives() {
        let (_, lines) = scan(".. echo:: 1\n.. echo:: 2\n").unwrap();

        let fragments: Vec<&String> = lines.iter().filter(|l| l.starts_with('[')).collect();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[1].contains(r#"args=["2"]"#));
    }
}
