//! Document tree with path lookups.
//!
//! Nodes are stored in a flat `Vec` with parent/children relationships
//! tracked by indices. This gives O(1) request path lookups through
//! `path_index` and keeps every child list in declaration order.

use std::collections::HashMap;

use crate::TreeError;
use crate::node::{DocumentNode, NodeId, NodeKind, SourceRef};

/// Extension of page markup sources.
const SOURCE_EXTENSION: &str = "md";

/// Previous and next siblings of a node.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Neighbours<'a> {
    /// Sibling declared just before the node.
    pub previous: Option<&'a DocumentNode>,
    /// Sibling declared just after the node.
    pub next: Option<&'a DocumentNode>,
}

/// Table of contents of the course.
///
/// Immutable once built. See [`DocumentTreeBuilder`] for construction.
#[derive(Debug)]
pub struct DocumentTree {
    nodes: Vec<DocumentNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl DocumentTree {
    /// Start building a tree.
    #[must_use]
    pub fn builder() -> DocumentTreeBuilder {
        DocumentTreeBuilder::new()
    }

    /// Root nodes in declaration order.
    #[must_use]
    pub fn get_top_level_content(&self) -> Vec<&DocumentNode> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Immediate children of a chapter in declaration order.
    ///
    /// Returns an empty list for pages and for nodes that do not belong to
    /// this tree.
    #[must_use]
    pub fn get_direct_content_of(&self, node: &DocumentNode) -> Vec<&DocumentNode> {
        let idx = node.id.0;
        match self.nodes.get(idx) {
            Some(own) if own.request_path == node.request_path => {
                self.children[idx].iter().map(|&j| &self.nodes[j]).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Chapter at `path`, or `None` if the path is unknown or names a page.
    ///
    /// Leading and trailing slashes are ignored.
    #[must_use]
    pub fn get_chapter_from_path(&self, path: &str) -> Option<&DocumentNode> {
        self.get_node(path).filter(|node| node.is_chapter())
    }

    /// Chapter or page at `path`.
    #[must_use]
    pub fn get_node(&self, path: &str) -> Option<&DocumentNode> {
        self.path_index
            .get(normalize(path))
            .map(|&i| &self.nodes[i])
    }

    /// Siblings around the node at `path`.
    ///
    /// Unknown paths have no neighbours.
    #[must_use]
    pub fn get_neighbours(&self, path: &str) -> Neighbours<'_> {
        let Some(&idx) = self.path_index.get(normalize(path)) else {
            return Neighbours::default();
        };

        let siblings = match self.parents[idx] {
            Some(parent) => &self.children[parent],
            None => &self.roots,
        };
        let Some(pos) = siblings.iter().position(|&i| i == idx) else {
            return Neighbours::default();
        };

        Neighbours {
            previous: pos
                .checked_sub(1)
                .map(|p| &self.nodes[siblings[p]]),
            next: siblings.get(pos + 1).map(|&n| &self.nodes[n]),
        }
    }

    /// Depth-first walk of the whole tree with each node's depth (roots at 0).
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, &DocumentNode)> {
        fn visit<'a>(
            tree: &'a DocumentTree,
            idx: usize,
            depth: usize,
            out: &mut Vec<(usize, &'a DocumentNode)>,
        ) {
            out.push((depth, &tree.nodes[idx]));
            for &child in &tree.children[idx] {
                visit(tree, child, depth + 1, out);
            }
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            visit(self, root, 0, &mut out);
        }
        out
    }

    /// Total number of chapters and pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Builder for [`DocumentTree`].
///
/// Nodes can only be appended under existing chapters, so the result is
/// always a tree.
#[derive(Debug, Default)]
pub struct DocumentTreeBuilder {
    nodes: Vec<DocumentNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl DocumentTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chapter under `parent` (or at the root).
    ///
    /// # Errors
    ///
    /// Fails on an invalid slug, a duplicate request path, or a parent that
    /// is not a chapter of this builder.
    pub fn add_chapter(
        &mut self,
        title: impl Into<String>,
        slug: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.add_node(title.into(), slug, parent, |_| NodeKind::Chapter)
    }

    /// Append a page under `parent` (or at the root).
    ///
    /// The page source is `<request_path>.md`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`add_chapter`](Self::add_chapter).
    pub fn add_page(
        &mut self,
        title: impl Into<String>,
        slug: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.add_node(title.into(), slug, parent, |path| NodeKind::Page {
            source: SourceRef::new(format!("{path}.{SOURCE_EXTENSION}")),
        })
    }

    fn add_node(
        &mut self,
        title: String,
        slug: &str,
        parent: Option<NodeId>,
        kind: impl FnOnce(&str) -> NodeKind,
    ) -> Result<NodeId, TreeError> {
        if !is_valid_slug(slug) {
            return Err(TreeError::InvalidSlug(slug.to_owned()));
        }

        let request_path = match parent {
            Some(NodeId(p)) => {
                let parent_node = self.nodes.get(p).ok_or(TreeError::UnknownParent)?;
                if !parent_node.is_chapter() {
                    return Err(TreeError::ParentNotChapter(
                        parent_node.request_path.clone(),
                    ));
                }
                format!("{}/{slug}", parent_node.request_path)
            }
            None => slug.to_owned(),
        };

        if self.path_index.contains_key(&request_path) {
            return Err(TreeError::DuplicatePath(request_path));
        }

        let idx = self.nodes.len();
        let kind = kind(&request_path);
        self.path_index.insert(request_path.clone(), idx);
        self.nodes.push(DocumentNode {
            id: NodeId(idx),
            title,
            request_path,
            kind,
        });
        self.children.push(Vec::new());
        self.parents.push(parent.map(|p| p.0));

        match parent {
            Some(NodeId(p)) => self.children[p].push(idx),
            None => self.roots.push(idx),
        }

        Ok(NodeId(idx))
    }

    #[must_use]
    pub fn build(self) -> DocumentTree {
        DocumentTree {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
            roots: self.roots,
            path_index: self.path_index,
        }
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
