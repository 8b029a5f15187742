//! Directive handler errors.

use crate::RenderError;

/// Error returned by a directive handler.
///
/// The pipeline attaches file, line and directive name before reporting it
/// as [`RenderError::Directive`].
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// Arguments or content do not fit the directive.
    #[error("{0}")]
    Definition(String),
    /// A referenced entity does not exist.
    #[error("{0}")]
    Resolution(String),
    /// Rendering nested content failed.
    #[error(transparent)]
    Nested(Box<RenderError>),
}

impl From<RenderError> for DirectiveError {
    fn from(err: RenderError) -> Self {
        Self::Nested(Box::new(err))
    }
}
