//! Tree construction errors.

use std::path::PathBuf;

/// Error returned when the document tree cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Two nodes resolve to the same request path.
    #[error("Duplicate request path: {0}")]
    DuplicatePath(String),
    /// Slug is empty or contains characters not allowed in a path segment.
    #[error("Invalid slug '{0}': use letters, digits, '-', '_' or '.'")]
    InvalidSlug(String),
    /// A node was attached to a page instead of a chapter.
    #[error("Cannot add children to page: {0}")]
    ParentNotChapter(String),
    /// Parent id does not belong to this builder.
    #[error("Unknown parent node")]
    UnknownParent,
    /// Declaration file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Declaration file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Declaration is not valid YAML.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Declaration is valid YAML but does not describe a tree.
    #[error("Invalid declaration at '{path}': {message}")]
    Declaration {
        /// Request path of the offending entry (empty for the root).
        path: String,
        /// What is wrong with the entry.
        message: String,
    },
}
