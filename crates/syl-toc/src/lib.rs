//! Chapter and page tree for the syllabus.
//!
//! The tree is the table of contents of the course: chapters contain pages
//! and further chapters, in the order the author declared them. It is built
//! once when content is loaded and is read-only afterward, so a single
//! `Arc<DocumentTree>` can be shared by every render.
//!
//! # Example
//!
//! ```
//! use syl_toc::DocumentTree;
//!
//! let mut builder = DocumentTree::builder();
//! let intro = builder.add_chapter("Introduction", "intro", None).unwrap();
//! builder.add_page("Getting started", "start", Some(intro)).unwrap();
//! let tree = builder.build();
//!
//! let chapter = tree.get_chapter_from_path("intro").unwrap();
//! let pages = tree.get_direct_content_of(chapter);
//! assert_eq!(pages[0].request_path(), "intro/start");
//! ```

mod error;
mod loader;
mod node;
mod tree;

pub use error::TreeError;
pub use loader::{load_declaration, parse_declaration};
pub use node::{DocumentNode, NodeId, NodeKind, SourceRef};
pub use tree::{DocumentTree, DocumentTreeBuilder, Neighbours};
