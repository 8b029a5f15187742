//! Submission lookup used by print rendering.

/// Error from a [`SubmissionSource`].
#[derive(Debug, thiserror::Error)]
#[error("Submission lookup failed: {0}")]
pub struct SubmissionError(pub String);

/// Source of a user's latest submission to a task.
///
/// Shared between concurrent renders.
pub trait SubmissionSource: Send + Sync {
    /// Last submitted code for `username` on `task_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails. Callers fall back to the
    /// directive content.
    fn last_submission(
        &self,
        username: &str,
        task_id: &str,
    ) -> Result<Option<String>, SubmissionError>;
}
