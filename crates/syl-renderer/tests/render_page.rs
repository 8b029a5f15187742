//! End-to-end page rendering with the built-in directives.

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use syl_renderer::directives::{AuthorDirective, ExerciseDirective, standard_registry};
use syl_renderer::{Identity, RenderContext, RenderError, RenderPipeline};
use syl_toc::parse_declaration;

const COURSE: &str = r"
basics:
  title: Basics
  content:
    variables:
      title: Variables
    loops:
      title: Loops
";

fn pipeline() -> RenderPipeline {
    let tree = Arc::new(parse_declaration(COURSE).unwrap());
    let registry = standard_registry(
        tree,
        ExerciseDirective::new("https://grader.example.org/course"),
        AuthorDirective::default(),
    );
    RenderPipeline::new(Arc::new(registry))
}

fn render(raw: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    pipeline()
        .render_page(raw, Path::new("basics/variables.md"), ctx)
        .map(|f| f.into_string())
}

#[test]
fn test_exercise_form_in_page() {
    let raw = "# Variables\n\nTry it:\n\n.. inginious:: ex1\n\n   print(\"hi\")\n\nDone.\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert!(html.starts_with("<h1>Variables</h1>\n<p>Try it:</p>\n<div class=\"inginious-task\""));
    assert!(html.contains("name=\"code\">print(\"hi\")</textarea>"));
    assert!(html.contains("name=\"taskid\" class=\"taskid\" value=\"ex1\""));
    assert!(html.ends_with("</div>\n<p>Done.</p>\n"));
}

#[test]
fn test_print_mode_page() {
    let raw = ".. inginious:: ex1 text/x-java 2\n\n   int x;\n\n.. framed:: 1\n";

    let html = render(raw, &RenderContext::print(None)).unwrap();

    assert_eq!(
        html,
        "<pre>int x;\n\n</pre>\n\
         <pre class=\"framed\" style=\"border: 1px solid #999; padding: 10px;\">\n</pre>\n"
    );
}

#[test]
fn test_gate_with_nested_toc() {
    let raw = ".. teacher::\n\n   Overview:\n\n   .. table-of-contents:: basics\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert!(html.starts_with("{% if logged_in and logged_in.right == \"admin\" %}\n<p>Overview:</p>\n"));
    assert!(html.contains("{% set toc_root = toc_chapter(\"basics\") %}"));
    assert!(html.ends_with("{% endif %}\n"));
}

#[test]
fn test_directives_inside_fenced_code_untouched() {
    let raw = "```rst\n.. inginious:: ex1\n```\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert_eq!(
        html,
        "<pre><code class=\"language-rst\">.. inginious:: ex1\n</code></pre>\n"
    );
}

#[test]
fn test_indented_code_showing_exercise_is_not_run() {
    let raw = "Intro\n\n    .. inginious:: ex1\n\n        code\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert_eq!(
        html,
        "<p>Intro</p>\n<pre><code>.. inginious:: ex1\n\n    code\n</code></pre>\n"
    );
}

#[test]
fn test_tab_indented_framed_is_code() {
    let html = render("\t.. framed:: 1\n", &RenderContext::default()).unwrap();

    assert_eq!(html, "<pre><code>.. framed:: 1\n</code></pre>\n");
}

#[test]
fn test_exercise_inside_list_item() {
    let raw = "1. Declare a variable:\n\n   .. inginious:: ex1\n\n      int x;\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    let form = html.find("<div class=\"inginious-task\"").unwrap();
    assert!(html.find("<li>").unwrap() < form);
    assert!(form < html.find("</li>").unwrap());
    assert!(html.contains(">int x;</textarea>"));
}

#[test]
fn test_framed_output_spliced_once() {
    let raw = ".. framed:: 0\n\n   x\n\n<!-- syl:fragment:0 -->\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert_eq!(
        html,
        "<pre class=\"framed\" style=\"border: 1px solid #999; padding: 10px;\">x</pre>\n\
         <!-- syl:fragment:0 -->\n"
    );
}

#[test]
fn test_unknown_directive_error() {
    let err = render("Intro\n\n.. image:: cat.png\n", &RenderContext::default()).unwrap_err();

    match err {
        RenderError::Directive {
            file,
            line,
            directive,
            ..
        } => {
            assert_eq!(file, Path::new("basics/variables.md"));
            assert_eq!(line, 3);
            assert_eq!(directive, "image");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_task_id_error() {
    let err = render(".. inginious::\n", &RenderContext::default()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "basics/variables.md:1: directive 'inginious': expected at least 1 argument(s), got 0"
    );
}

#[test]
fn test_unknown_toc_chapter_error() {
    let err = render(".. table-of-contents:: nowhere\n", &RenderContext::default()).unwrap_err();

    assert!(err.to_string().contains("no chapter at path 'nowhere'"));
}

#[test]
fn test_author_without_content_error() {
    let err = render(".. author::\n\nText\n", &RenderContext::default()).unwrap_err();

    assert!(err.to_string().contains("content block is required"));
}

#[test]
fn test_author_template_syntax_in_exercise_is_inert() {
    let raw = ".. inginious:: ex1\n\n   {{ secret }} {% if x %}\n";

    let html = render(raw, &RenderContext::default()).unwrap();

    assert!(html.contains("&#123;{ secret }} &#123;% if x %}"));
}

#[test]
fn test_render_is_pure() {
    let raw = "# T\n\n.. inginious:: ex1\n\n   x\n\n.. teacher::\n\n   .. table-of-contents::\n";
    let ctx = RenderContext::online(Some(Identity::new("alice", "admin")));
    let p = pipeline();

    let first = p.render_page(raw, Path::new("t.md"), &ctx).unwrap();
    let second = p.render_page(raw, Path::new("t.md"), &ctx).unwrap();

    assert_eq!(first, second);
}
