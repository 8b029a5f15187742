//! Document tree nodes.

use std::path::{Path, PathBuf};

/// Handle to the markup source of a page, relative to the content directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef(PathBuf);

impl SourceRef {
    /// Create a source handle from a relative path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Relative path of the markup source.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Index of a node inside its [`DocumentTree`](crate::DocumentTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Whether a node is a composite chapter or a leaf page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Composite node; its children live in the tree.
    Chapter,
    /// Leaf node backed by a markup source.
    Page {
        /// Markup source of the page.
        source: SourceRef,
    },
}

/// A chapter or page of the course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentNode {
    pub(crate) id: NodeId,
    pub(crate) title: String,
    pub(crate) request_path: String,
    pub(crate) kind: NodeKind,
}

impl DocumentNode {
    /// Node id inside the owning tree.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URL path without leading slash (e.g. `"intro/start"`).
    #[must_use]
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// True for chapters, false for pages.
    #[must_use]
    pub fn is_chapter(&self) -> bool {
        matches!(self.kind, NodeKind::Chapter)
    }

    /// Markup source, `None` for chapters.
    #[must_use]
    pub fn source_ref(&self) -> Option<&SourceRef> {
        match &self.kind {
            NodeKind::Chapter => None,
            NodeKind::Page { source } => Some(source),
        }
    }
}
