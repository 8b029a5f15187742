//! YAML course declaration loader.
//!
//! The declaration is an ordered mapping of slugs to entries:
//!
//! ```yaml
//! basics:
//!   title: "The basics"
//!   content:
//!     variables:
//!       title: "Variables"
//! ```
//!
//! An entry with a `content` key is a chapter (even when the value is empty);
//! any other entry is a page whose source is `<request_path>.md`.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::{DocumentTree, DocumentTreeBuilder, NodeId, TreeError};

/// Read and parse a declaration file.
///
/// # Errors
///
/// Returns [`TreeError::Io`] if the file cannot be read, or any error from
/// [`parse_declaration`].
pub fn load_declaration(path: &Path) -> Result<DocumentTree, TreeError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = parse_declaration(&yaml)?;
    tracing::info!(
        path = %path.display(),
        node_count = tree.len(),
        "Loaded course declaration"
    );
    Ok(tree)
}

/// Parse a declaration from YAML text.
///
/// # Errors
///
/// Returns [`TreeError::Parse`] for invalid YAML, [`TreeError::Declaration`]
/// for entries that do not describe a chapter or page, and builder errors for
/// invalid slugs or duplicate paths.
pub fn parse_declaration(yaml: &str) -> Result<DocumentTree, TreeError> {
    let root: Value = serde_yaml::from_str(yaml)?;
    let mut builder = DocumentTree::builder();

    match root {
        Value::Null => {}
        Value::Mapping(entries) => add_entries(&mut builder, &entries, None, "")?,
        _ => {
            return Err(TreeError::Declaration {
                path: String::new(),
                message: "top level must be a mapping of slugs to entries".to_owned(),
            });
        }
    }

    Ok(builder.build())
}

fn add_entries(
    builder: &mut DocumentTreeBuilder,
    entries: &Mapping,
    parent: Option<NodeId>,
    parent_path: &str,
) -> Result<(), TreeError> {
    for (key, value) in entries {
        let Some(slug) = key.as_str() else {
            return Err(declaration_error(parent_path, "entry keys must be strings"));
        };
        let path = join(parent_path, slug);

        let Some(entry) = value.as_mapping() else {
            return Err(declaration_error(&path, "entry must be a mapping"));
        };
        let title = match entry.get("title") {
            Some(Value::String(title)) => title.clone(),
            Some(_) => return Err(declaration_error(&path, "title must be a string")),
            None => return Err(declaration_error(&path, "missing title")),
        };

        match entry.get("content") {
            None => {
                builder.add_page(title, slug, parent)?;
            }
            Some(Value::Null) => {
                builder.add_chapter(title, slug, parent)?;
            }
            Some(Value::Mapping(children)) => {
                let id = builder.add_chapter(title, slug, parent)?;
                add_entries(builder, children, Some(id), &path)?;
            }
            Some(_) => {
                return Err(declaration_error(&path, "content must be a mapping"));
            }
        }
    }
    Ok(())
}

fn join(parent_path: &str, slug: &str) -> String {
    if parent_path.is_empty() {
        slug.to_owned()
    } else {
        format!("{parent_path}/{slug}")
    }
}

fn declaration_error(path: &str, message: &str) -> TreeError {
    TreeError::Declaration {
        path: path.to_owned(),
        message: message.to_owned(),
    }
}
