//! Embedded programming exercises (`inginious`, `inginious-sandbox`).
//!
//! ```text
//! .. inginious:: task_id [language] [print_blank_lines]
//!    :submit: Send
//!
//!    prefilled code
//! ```
//!
//! Online, the exercise is either a form posted straight to the grader or an
//! iframe opened with a signed LTI launch. In print mode it becomes a `<pre>`
//! block with the user's last submission (or the prefilled code) followed by
//! room for handwritten answers.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use syl_lti::{LaunchParamsProvider, LtiLaunch};

use crate::directive::{
    ContentRule, Directive, DirectiveContext, DirectiveError, DirectiveOutput, DirectiveSpec,
    Invocation,
};
use crate::util::{escape_attr, escape_content};
use crate::{Identity, SubmissionSource};

use super::parse_count;

/// Editor language when none is given.
pub const DEFAULT_LANGUAGE: &str = "text/x-java";

/// User-facing texts of exercise widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseLabels {
    /// Submit button text.
    pub submit: String,
    /// Shown instead of an LTI exercise to anonymous users.
    pub login_required: String,
    /// Shown when the launch cannot be prepared.
    pub unavailable: String,
}

impl Default for ExerciseLabels {
    fn default() -> Self {
        Self {
            submit: "Submit".to_owned(),
            login_required: "Please log in to work on this exercise.".to_owned(),
            unavailable: "This exercise is currently unavailable.".to_owned(),
        }
    }
}

/// How answers reach the grader.
#[derive(Clone, Default)]
pub enum ExerciseProtocol {
    /// Form POST to the grader (or the same-origin proxy).
    #[default]
    Direct,
    /// Iframe opened with a signed LTI launch.
    Lti(Arc<dyn LaunchParamsProvider>),
}

impl fmt::Debug for ExerciseProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct"),
            Self::Lti(_) => f.write_str("Lti"),
        }
    }
}

/// Handler for exercise directives.
#[derive(Clone)]
pub struct ExerciseDirective {
    submission_url: String,
    protocol: ExerciseProtocol,
    submissions: Option<Arc<dyn SubmissionSource>>,
    labels: ExerciseLabels,
}

impl ExerciseDirective {
    /// Exercises posting to `submission_url`.
    #[must_use]
    pub fn new(submission_url: impl Into<String>) -> Self {
        Self {
            submission_url: submission_url.into(),
            protocol: ExerciseProtocol::Direct,
            submissions: None,
            labels: ExerciseLabels::default(),
        }
    }

    /// Embed exercises through LTI launches.
    #[must_use]
    pub fn with_lti(mut self, provider: Arc<dyn LaunchParamsProvider>) -> Self {
        self.protocol = ExerciseProtocol::Lti(provider);
        self
    }

    /// Look up previous submissions in print mode.
    #[must_use]
    pub fn with_submissions(mut self, submissions: Arc<dyn SubmissionSource>) -> Self {
        self.submissions = Some(submissions);
        self
    }

    /// Replace the widget labels.
    #[must_use]
    pub fn with_labels(mut self, labels: ExerciseLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Same handler forced to the direct protocol.
    #[must_use]
    pub fn sandbox(&self) -> Self {
        Self {
            protocol: ExerciseProtocol::Direct,
            ..self.clone()
        }
    }

    /// Active protocol.
    #[must_use]
    pub fn protocol(&self) -> &ExerciseProtocol {
        &self.protocol
    }

    fn online_direct(&self, exercise: &Exercise<'_>) -> String {
        let task = escape_attr(exercise.task_id);
        let submit = escape_attr(exercise.submit_label.unwrap_or(&self.labels.submit));
        format!(
            concat!(
                "<div class=\"inginious-task\" data-language=\"{language}\">\n",
                "<div class=\"feedback-container alert\" hidden></div>\n",
                "<form method=\"post\" action=\"{action}\">\n",
                "<textarea class=\"inginious-code\" name=\"code\">{code}</textarea>\n",
                "<input type=\"hidden\" name=\"taskid\" class=\"taskid\" value=\"{task}\">\n",
                "<input type=\"hidden\" name=\"input\" class=\"to-submit\">\n",
                "</form>\n",
                "<button class=\"btn btn-primary button-inginious-task\" id=\"{task}\" value=\"{submit}\">{submit}</button>\n",
                "</div>",
            ),
            language = escape_attr(exercise.language),
            action = escape_attr(&self.submission_url),
            code = escape_content(&exercise.content),
            task = task,
            submit = submit,
        )
    }

    fn online_lti(
        &self,
        provider: &dyn LaunchParamsProvider,
        exercise: &Exercise<'_>,
        identity: Option<&Identity>,
    ) -> String {
        let Some(identity) = identity else {
            return placeholder(exercise.task_id, &self.labels.login_required);
        };

        let launch = provider
            .launch_params(&identity.username, exercise.task_id)
            .and_then(|launch| launch.validate().map(|()| launch));
        match launch {
            Ok(launch) => lti_frame(exercise, &launch),
            Err(err) => {
                tracing::warn!(
                    task_id = exercise.task_id,
                    error = %err,
                    "LTI launch unavailable"
                );
                placeholder(exercise.task_id, &self.labels.unavailable)
            }
        }
    }

    fn print(&self, exercise: &Exercise<'_>, identity: Option<&Identity>) -> String {
        let submission = identity.and_then(|identity| self.last_submission(identity, exercise));
        let body = submission.as_deref().unwrap_or(&exercise.content);
        print_block(body, exercise.blank_lines)
    }

    fn last_submission(&self, identity: &Identity, exercise: &Exercise<'_>) -> Option<String> {
        let source = self.submissions.as_ref()?;
        match source.last_submission(&identity.username, exercise.task_id) {
            Ok(submission) => submission,
            Err(err) => {
                tracing::warn!(
                    task_id = exercise.task_id,
                    error = %err,
                    "Submission lookup failed, printing prefilled code"
                );
                None
            }
        }
    }
}

impl fmt::Debug for ExerciseDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseDirective")
            .field("submission_url", &self.submission_url)
            .field("protocol", &self.protocol)
            .field("submissions", &self.submissions.is_some())
            .field("labels", &self.labels)
            .finish()
    }
}

impl Directive for ExerciseDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec::new(1, 2, ContentRule::Optional).with_options(&["submit"])
    }

    fn run(
        &self,
        invocation: &Invocation,
        ctx: &DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        let exercise = Exercise::from_invocation(invocation)?;
        let identity = ctx.render.identity.as_ref();

        let html = match (&self.protocol, ctx.render.print_mode) {
            (ExerciseProtocol::Direct, false) => self.online_direct(&exercise),
            (ExerciseProtocol::Lti(provider), false) => {
                self.online_lti(provider.as_ref(), &exercise, identity)
            }
            (ExerciseProtocol::Direct, true) => self.print(&exercise, identity),
            (ExerciseProtocol::Lti(_), true) => match identity {
                Some(_) => self.print(&exercise, identity),
                None => format!(
                    "{}\n{}",
                    placeholder(exercise.task_id, &self.labels.login_required),
                    print_block(&exercise.content, exercise.blank_lines)
                ),
            },
        };
        Ok(DirectiveOutput::Html(html))
    }
}

/// Validated exercise arguments.
struct Exercise<'a> {
    task_id: &'a str,
    language: &'a str,
    blank_lines: usize,
    content: String,
    submit_label: Option<&'a str>,
}

impl<'a> Exercise<'a> {
    fn from_invocation(invocation: &'a Invocation) -> Result<Self, DirectiveError> {
        let task_id = invocation
            .argument(0)
            .ok_or_else(|| DirectiveError::Definition("missing task id".to_owned()))?;
        let blank_lines = invocation
            .argument(2)
            .map(|value| parse_count(value, "print_blank_lines"))
            .transpose()?
            .unwrap_or(0);

        Ok(Self {
            task_id,
            language: invocation.argument(1).unwrap_or(DEFAULT_LANGUAGE),
            blank_lines,
            content: invocation.content_text(),
            submit_label: invocation.option("submit"),
        })
    }
}

fn placeholder(task_id: &str, message: &str) -> String {
    format!(
        "<div class=\"inginious-task inginious-placeholder\" data-task=\"{}\"><p>{}</p></div>",
        escape_attr(task_id),
        escape_content(message)
    )
}

/// `<pre>` block padded with `blank_lines` newlines, at least one when empty.
fn print_block(body: &str, blank_lines: usize) -> String {
    let padding = if body.is_empty() {
        blank_lines.max(1)
    } else {
        blank_lines
    };
    format!("<pre>{}{}</pre>", escape_content(body), "\n".repeat(padding))
}

fn lti_frame(exercise: &Exercise<'_>, launch: &LtiLaunch) -> String {
    let frame = format!("inginious-lti-{}", escape_attr(exercise.task_id));
    let mut html = format!(
        concat!(
            "<div class=\"inginious-task\" data-language=\"{language}\">\n",
            "<iframe name=\"{frame}\" class=\"inginious-lti\" frameborder=\"0\" allowfullscreen=\"true\" ",
            "scrolling=\"no\" style=\"overflow: hidden; width: 100%; height: 520px\"></iframe>\n",
            "<form class=\"inginious-lti-launch\" method=\"post\" action=\"{action}\" target=\"{frame}\">\n",
        ),
        language = escape_attr(exercise.language),
        frame = frame,
        action = escape_attr(&launch.launch_url),
    );
    for (name, value) in &launch.params {
        let _ = writeln!(
            html,
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            escape_attr(name),
            escape_attr(value)
        );
    }
    html.push_str("</form>\n");
    html.push_str("<script>document.currentScript.previousElementSibling.submit();</script>\n");
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use syl_lti::LtiError;

    use super::*;
    use crate::{RenderContext, SubmissionError};

    struct FakeLaunch {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
        signed: bool,
    }

    impl FakeLaunch {
        fn new(fail: bool, signed: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail,
                signed,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl LaunchParamsProvider for FakeLaunch {
        fn launch_params(&self, username: &str, task_id: &str) -> Result<LtiLaunch, LtiError> {
            self.calls
                .lock()
                .unwrap()
                .push((username.to_owned(), task_id.to_owned()));
            if self.fail {
                return Err(LtiError::Unavailable("down".to_owned()));
            }
            let mut params = BTreeMap::new();
            params.insert("user_id".to_owned(), username.to_owned());
            if self.signed {
                params.insert("oauth_signature".to_owned(), "c2ln".to_owned());
            }
            Ok(LtiLaunch {
                launch_url: "https://grader.example.org/lti".to_owned(),
                params,
            })
        }
    }

    struct FakeSubmissions(Option<&'static str>, bool);

    impl SubmissionSource for FakeSubmissions {
        fn last_submission(
            &self,
            _username: &str,
            _task_id: &str,
        ) -> Result<Option<String>, SubmissionError> {
            if self.1 {
                return Err(SubmissionError("db down".to_owned()));
            }
            Ok(self.0.map(str::to_owned))
        }
    }

    fn invocation(arguments: &[&str], content: &[&str]) -> Invocation {
        Invocation {
            name: "inginious".to_owned(),
            arguments: arguments.iter().map(|s| (*s).to_owned()).collect(),
            content: content.iter().map(|s| (*s).to_owned()).collect(),
            line: 1,
            content_line: 3,
            ..Default::default()
        }
    }

    fn run(
        directive: &ExerciseDirective,
        invocation: &Invocation,
        render: &RenderContext,
    ) -> Result<String, DirectiveError> {
        let ctx = DirectiveContext {
            source_path: Path::new("page.md"),
            line: 1,
            render,
            render_nested: &|text, _| Ok(text.to_owned()),
        };
        directive
            .run(invocation, &ctx)
            .map(DirectiveOutput::into_string)
    }

    fn alice() -> Option<Identity> {
        Some(Identity::new("alice", "student"))
    }

    #[test]
    fn test_online_direct_form() {
        let directive = ExerciseDirective::new("https://grader.example.org/course");

        let html = run(
            &directive,
            &invocation(&["ex1"], &["print(\"hi\")"]),
            &RenderContext::default(),
        )
        .unwrap();

        assert!(html.contains("action=\"https://grader.example.org/course\""));
        assert!(html.contains(
            "<textarea class=\"inginious-code\" name=\"code\">print(\"hi\")</textarea>"
        ));
        assert!(html.contains("name=\"taskid\" class=\"taskid\" value=\"ex1\""));
        assert!(html.contains("data-language=\"text/x-java\""));
        assert!(html.contains(">Submit</button>"));
    }

    #[test]
    fn test_online_direct_language_and_submit_option() {
        let directive = ExerciseDirective::new("/postinginious");
        let mut inv = invocation(&["ex1", "text/x-python"], &[]);
        inv.options.insert("submit".to_owned(), "Send".to_owned());

        let html = run(&directive, &inv, &RenderContext::default()).unwrap();

        assert!(html.contains("data-language=\"text/x-python\""));
        assert!(html.contains("action=\"/postinginious\""));
        assert!(html.contains(">Send</button>"));
    }

    #[test]
    fn test_online_direct_escapes_author_text() {
        let directive = ExerciseDirective::new("/post");

        let html = run(
            &directive,
            &invocation(&["a\"b"], &["</textarea>{{ x }}"]),
            &RenderContext::default(),
        )
        .unwrap();

        assert!(html.contains("&lt;/textarea&gt;&#123;{ x }}"));
        assert!(html.contains("value=\"a&quot;b\""));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_online_lti_with_identity() {
        let provider = FakeLaunch::new(false, true);
        let directive = ExerciseDirective::new("/post").with_lti(provider.clone());

        let html = run(
            &directive,
            &invocation(&["ex1"], &[]),
            &RenderContext::online(alice()),
        )
        .unwrap();

        assert!(html.contains("<iframe name=\"inginious-lti-ex1\""));
        assert!(html.contains("action=\"https://grader.example.org/lti\" target=\"inginious-lti-ex1\""));
        assert!(html.contains("<input type=\"hidden\" name=\"user_id\" value=\"alice\">"));
        assert!(html.contains("<script>"));
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![("alice".to_owned(), "ex1".to_owned())]
        );
    }

    #[test]
    fn test_online_lti_anonymous_shows_login_placeholder() {
        let provider = FakeLaunch::new(false, true);
        let directive = ExerciseDirective::new("/post").with_lti(provider.clone());

        let html = run(&directive, &invocation(&["ex1"], &[]), &RenderContext::default()).unwrap();

        assert_eq!(
            html,
            "<div class=\"inginious-task inginious-placeholder\" data-task=\"ex1\">\
             <p>Please log in to work on this exercise.</p></div>"
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_online_lti_failure_degrades() {
        let directive = ExerciseDirective::new("/post").with_lti(FakeLaunch::new(true, true));

        let html = run(
            &directive,
            &invocation(&["ex1"], &[]),
            &RenderContext::online(alice()),
        )
        .unwrap();

        assert!(html.contains("This exercise is currently unavailable."));
    }

    #[test]
    fn test_online_lti_malformed_launch_degrades() {
        let directive = ExerciseDirective::new("/post").with_lti(FakeLaunch::new(false, false));

        let html = run(
            &directive,
            &invocation(&["ex1"], &[]),
            &RenderContext::online(alice()),
        )
        .unwrap();

        assert!(html.contains("inginious-placeholder"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_sandbox_forces_direct() {
        let provider = FakeLaunch::new(false, true);
        let directive = ExerciseDirective::new("/post").with_lti(provider.clone());

        let html = run(
            &directive.sandbox(),
            &invocation(&["ex1"], &["x = 1"]),
            &RenderContext::online(alice()),
        )
        .unwrap();

        assert!(html.contains("<textarea"));
        assert_eq!(provider.call_count(), 0);
        assert!(matches!(directive.protocol(), ExerciseProtocol::Lti(_)));
    }

    #[test]
    fn test_print_content_with_padding() {
        let directive = ExerciseDirective::new("/post");

        let html = run(
            &directive,
            &invocation(&["ex1", "text/x-java", "3"], &["int x;"]),
            &RenderContext::print(None),
        )
        .unwrap();

        assert_eq!(html, "<pre>int x;\n\n\n</pre>");
    }

    #[test]
    fn test_print_empty_content_clamps_to_one_line() {
        let directive = ExerciseDirective::new("/post");

        let html = run(&directive, &invocation(&["ex1"], &[]), &RenderContext::print(None)).unwrap();

        assert_eq!(html, "<pre>\n</pre>");
    }

    #[test]
    fn test_print_empty_content_keeps_larger_padding() {
        let directive = ExerciseDirective::new("/post");

        let html = run(
            &directive,
            &invocation(&["ex1", "text/x-java", "2"], &[]),
            &RenderContext::print(None),
        )
        .unwrap();

        assert_eq!(html, "<pre>\n\n</pre>");
    }

    #[test]
    fn test_print_uses_last_submission() {
        let directive = ExerciseDirective::new("/post")
            .with_submissions(Arc::new(FakeSubmissions(Some("answer()"), false)));

        let html = run(
            &directive,
            &invocation(&["ex1", "text/x-java", "1"], &["template()"]),
            &RenderContext::print(alice()),
        )
        .unwrap();

        assert_eq!(html, "<pre>answer()\n</pre>");
    }

    #[test]
    fn test_print_submission_error_falls_back_to_content() {
        let directive = ExerciseDirective::new("/post")
            .with_submissions(Arc::new(FakeSubmissions(None, true)));

        let html = run(
            &directive,
            &invocation(&["ex1"], &["template()"]),
            &RenderContext::print(alice()),
        )
        .unwrap();

        assert_eq!(html, "<pre>template()</pre>");
    }

    #[test]
    fn test_print_lti_anonymous_placeholder_and_content() {
        let provider = FakeLaunch::new(false, true);
        let directive = ExerciseDirective::new("/post")
            .with_lti(provider.clone())
            .with_submissions(Arc::new(FakeSubmissions(Some("never"), false)));

        let html = run(
            &directive,
            &invocation(&["ex1", "text/x-java", "1"], &["code"]),
            &RenderContext::print(None),
        )
        .unwrap();

        assert!(html.contains("inginious-placeholder"));
        assert!(html.ends_with("<pre>code\n</pre>"));
        assert!(!html.contains("never"));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_print_lti_with_identity_uses_submission() {
        let directive = ExerciseDirective::new("/post")
            .with_lti(FakeLaunch::new(false, true))
            .with_submissions(Arc::new(FakeSubmissions(Some("mine"), false)));

        let html = run(
            &directive,
            &invocation(&["ex1"], &["code"]),
            &RenderContext::print(alice()),
        )
        .unwrap();

        assert_eq!(html, "<pre>mine</pre>");
    }

    #[test]
    fn test_invalid_blank_line_count() {
        let directive = ExerciseDirective::new("/post");

        for value in ["-1", "two", "1.5"] {
            let err = run(
                &directive,
                &invocation(&["ex1", "text/x-java", value], &[]),
                &RenderContext::print(None),
            )
            .unwrap_err();
            assert!(
                err.to_string().contains("print_blank_lines"),
                "unexpected error for {value}: {err}"
            );
        }
    }
}
