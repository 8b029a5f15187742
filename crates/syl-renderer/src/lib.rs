//! Directive-extended markdown rendering for interactive syllabi.
//!
//! Pages are markdown with reStructuredText-style directives that embed
//! programming exercises, tables of contents, teacher-only blocks, answer
//! boxes and author credits. Rendering produces a [`Fragment`]: HTML in which
//! author text is inert, plus template source that a second stage evaluates
//! against the viewer and the document tree.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use std::sync::Arc;
//! use syl_renderer::directives::{AuthorDirective, ExerciseDirective, standard_registry};
//! use syl_renderer::{RenderContext, RenderPipeline};
//! use syl_toc::DocumentTree;
//!
//! let registry = standard_registry(
//!     Arc::new(DocumentTree::builder().build()),
//!     ExerciseDirective::new("https://grader.example.org/course"),
//!     AuthorDirective::default(),
//! );
//! let pipeline = RenderPipeline::new(Arc::new(registry));
//!
//! let raw = ".. inginious:: ex1\n\n   print(\"hi\")\n";
//! let fragment = pipeline
//!     .render_page(raw, Path::new("intro.md"), &RenderContext::default())
//!     .unwrap();
//!
//! assert!(fragment.as_str().contains("name=\"code\">print(\"hi\")</textarea>"));
//! ```

mod code_blocks;
mod context;
pub mod directive;
pub mod directives;
mod pipeline;
mod submission;
mod util;

pub use context::{ADMIN_ROLE, Identity, RenderContext};
pub use pipeline::{DEFAULT_MAX_NESTING_DEPTH, Fragment, RenderError, RenderPipeline};
pub use submission::{SubmissionError, SubmissionSource};
pub use util::{escape_html, escape_template_syntax};
