//! Built-in syllabus directives.

mod author;
mod exercise;
mod framed;
mod gate;
mod toc;

use std::sync::Arc;

use syl_toc::DocumentTree;

pub use author::{AuthorDirective, DEFAULT_AUTHOR_LABEL};
pub use exercise::{DEFAULT_LANGUAGE, ExerciseDirective, ExerciseLabels, ExerciseProtocol};
pub use framed::FramedDirective;
pub use gate::GateDirective;
pub use toc::{CURRENT_CHAPTER, TocDirective};

use crate::directive::{DirectiveError, DirectiveRegistry};

/// Registry with every built-in directive.
///
/// `inginious-sandbox` reuses `exercise` with the direct protocol forced.
#[must_use]
pub fn standard_registry(
    tree: Arc<DocumentTree>,
    exercise: ExerciseDirective,
    author: AuthorDirective,
) -> DirectiveRegistry {
    let sandbox = exercise.sandbox();
    DirectiveRegistry::builder()
        .register("inginious", exercise)
        .register("inginious-sandbox", sandbox)
        .register("table-of-contents", TocDirective::new(tree))
        .register("teacher", GateDirective)
        .register("framed", FramedDirective)
        .register("author", author)
        .build()
}

/// Parse a non-negative line count argument.
fn parse_count(value: &str, what: &str) -> Result<usize, DirectiveError> {
    value.parse().map_err(|_| {
        DirectiveError::Definition(format!(
            "{what} must be a non-negative integer, got '{value}'"
        ))
    })
}
