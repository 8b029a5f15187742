//! Course loading and page rendering.
//!
//! A [`Site`] ties the document tree to the render pipeline and the page
//! sources on disk. Pages are read from `<source_dir>/<request_path>.md`;
//! chapters render their optional `<source_dir>/<request_path>/index.md`.
//!
//! Rendering is two-phase: [`Site::render_fragment`] produces the
//! viewer-independent fragment, [`Site::render`] additionally evaluates it
//! for one viewer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use syl_config::{Config, ConfigError};
use syl_lti::{LaunchParamsProvider, LtiSigner};
use syl_renderer::directives::{
    AuthorDirective, ExerciseDirective, ExerciseLabels, standard_registry,
};
use syl_renderer::{RenderContext, RenderError, RenderPipeline, SubmissionSource};
use syl_toc::{DocumentNode, DocumentTree, TreeError, load_declaration};

use crate::stage::{Stage, StageError};

/// Error returned when loading a site or rendering a page fails.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No node at the requested path.
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// Page source file is missing.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Page source could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Course declaration is invalid.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Directive or markup error.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Template evaluation error.
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// External services used by exercises.
#[derive(Clone, Default)]
pub struct Collaborators {
    /// Replaces the local signer when the LTI protocol is configured.
    pub launch_params: Option<Arc<dyn LaunchParamsProvider>>,
    /// Previous submissions shown in print mode.
    pub submissions: Option<Arc<dyn SubmissionSource>>,
}

/// Title and path of a neighbouring node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub title: String,
    pub request_path: String,
}

impl NavLink {
    fn from_node(node: &DocumentNode) -> Self {
        Self {
            title: node.title().to_owned(),
            request_path: node.request_path().to_owned(),
        }
    }
}

/// Result of rendering a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Node title from the declaration.
    pub title: String,
    /// Request path of the node.
    pub request_path: String,
    /// Request path of the enclosing chapter (the node itself for chapters).
    pub chapter: Option<String>,
    /// Previous sibling.
    pub previous: Option<NavLink>,
    /// Next sibling.
    pub next: Option<NavLink>,
    /// Fragment or evaluated HTML, depending on the render phase.
    pub html: String,
}

/// Loaded course.
#[derive(Debug)]
pub struct Site {
    tree: Arc<DocumentTree>,
    pipeline: RenderPipeline,
    stage: Stage,
    source_dir: PathBuf,
}

impl Site {
    /// Create a site from its parts.
    #[must_use]
    pub fn new(tree: Arc<DocumentTree>, pipeline: RenderPipeline, source_dir: PathBuf) -> Self {
        Self {
            stage: Stage::new(Arc::clone(&tree)),
            tree,
            pipeline,
            source_dir,
        }
    }

    /// Load the course described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Tree`] if the declaration cannot be loaded and
    /// [`SiteError::Config`] if the LTI section is invalid.
    pub fn load(config: &Config, collaborators: Collaborators) -> Result<Self, SiteError> {
        let tree = Arc::new(load_declaration(&config.content_resolved.declaration)?);

        let labels = ExerciseLabels {
            submit: config.labels.submit.clone(),
            login_required: config.labels.login_required.clone(),
            unavailable: config.labels.unavailable.clone(),
        };
        let mut exercise =
            ExerciseDirective::new(config.grader.submission_url()).with_labels(labels);
        if let Some(lti) = config.lti()? {
            let provider: Arc<dyn LaunchParamsProvider> = match collaborators.launch_params {
                Some(provider) => provider,
                None => Arc::new(LtiSigner::new(
                    &lti.launch_url,
                    &lti.consumer_key,
                    &lti.consumer_secret,
                    &lti.context_id,
                )),
            };
            exercise = exercise.with_lti(provider);
        }
        if let Some(submissions) = collaborators.submissions {
            exercise = exercise.with_submissions(submissions);
        }

        let registry = standard_registry(
            Arc::clone(&tree),
            exercise,
            AuthorDirective::new(&config.labels.authors),
        );
        let pipeline = RenderPipeline::new(Arc::new(registry))
            .with_max_nesting_depth(config.render.max_nesting_depth);

        tracing::info!(
            source_dir = %config.content_resolved.source_dir.display(),
            nodes = tree.len(),
            lti = config.lti.is_some(),
            "Loaded site"
        );

        Ok(Self::new(
            tree,
            pipeline,
            config.content_resolved.source_dir.clone(),
        ))
    }

    /// Document tree.
    #[must_use]
    pub fn tree(&self) -> &Arc<DocumentTree> {
        &self.tree
    }

    /// Second-stage template environment.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Source file of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] for unknown paths.
    pub fn source_path(&self, path: &str) -> Result<PathBuf, SiteError> {
        let node = self.node(path)?;
        Ok(self.source_of(node))
    }

    /// Render the viewer-independent fragment of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unknown, the source cannot be read, or
    /// a directive fails.
    pub fn render_fragment(
        &self,
        path: &str,
        ctx: &RenderContext,
    ) -> Result<RenderedPage, SiteError> {
        let node = self.node(path)?;
        let source = self.source_of(node);
        let raw = self.read_source(node, &source)?;

        let relative = source.strip_prefix(&self.source_dir).unwrap_or(&source);
        let fragment = self.pipeline.render_page(&raw, relative, ctx)?;

        let neighbours = self.tree.get_neighbours(node.request_path());
        Ok(RenderedPage {
            title: node.title().to_owned(),
            request_path: node.request_path().to_owned(),
            chapter: enclosing_chapter(node),
            previous: neighbours.previous.map(NavLink::from_node),
            next: neighbours.next.map(NavLink::from_node),
            html: fragment.into_string(),
        })
    }

    /// Render the node at `path` for the viewer described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`render_fragment`](Self::render_fragment) or
    /// from template evaluation.
    pub fn render(&self, path: &str, ctx: &RenderContext) -> Result<RenderedPage, SiteError> {
        let mut page = self.render_fragment(path, ctx)?;
        page.html = self
            .stage
            .render(&page.html, ctx, page.chapter.as_deref())?;
        tracing::debug!(path = %page.request_path, "Rendered page");
        Ok(page)
    }

    fn node(&self, path: &str) -> Result<&DocumentNode, SiteError> {
        self.tree
            .get_node(path)
            .ok_or_else(|| SiteError::PageNotFound(path.to_owned()))
    }

    fn source_of(&self, node: &DocumentNode) -> PathBuf {
        match node.source_ref() {
            Some(source) => self.source_dir.join(source.path()),
            None => self.source_dir.join(node.request_path()).join("index.md"),
        }
    }

    /// Read a node's source; chapters without an index have an empty body.
    fn read_source(&self, node: &DocumentNode, source: &Path) -> Result<String, SiteError> {
        match std::fs::read_to_string(source) {
            Ok(raw) => Ok(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if node.is_chapter() {
                    tracing::debug!(path = %source.display(), "Chapter has no index page");
                    Ok(String::new())
                } else {
                    Err(SiteError::SourceNotFound(source.to_path_buf()))
                }
            }
            Err(source_err) => Err(SiteError::Io {
                path: source.to_path_buf(),
                source: source_err,
            }),
        }
    }
}

fn enclosing_chapter(node: &DocumentNode) -> Option<String> {
    if node.is_chapter() {
        return Some(node.request_path().to_owned());
    }
    node.request_path()
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_owned())
}
