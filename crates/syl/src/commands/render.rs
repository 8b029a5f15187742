//! `syl render` command implementation.

use std::path::PathBuf;

use clap::Args;
use syl_renderer::{Identity, RenderContext};
use syl_site::{Collaborators, Site};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Request path of the page (e.g. `basics/variables`).
    path: String,

    /// Render for printing instead of online viewing.
    #[arg(long)]
    print: bool,

    /// Render for this logged-in user (default: anonymous).
    #[arg(short, long)]
    user: Option<String>,

    /// Role of the user; `admin` reveals teacher blocks.
    #[arg(long, requires = "user", default_value = "student")]
    role: String,

    /// Stop after directive rendering and output the template fragment.
    #[arg(long)]
    fragment: bool,

    /// Path to configuration file (default: auto-discover syllabus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Course source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Grading service URL (overrides config).
    #[arg(long, env = "SYL_COURSE_URL")]
    course_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading or rendering fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let ctx = self.render_context()?;
        let config = super::load_config(
            self.config.as_deref(),
            self.source_dir.clone(),
            self.course_url.clone(),
        )?;
        let site = Site::load(&config, Collaborators::default())?;

        let path = self.path.trim_matches('/');
        tracing::info!(
            path,
            print_mode = ctx.print_mode,
            user = ctx.username(),
            "Rendering page"
        );
        let page = if self.fragment {
            site.render_fragment(path, &ctx)?
        } else {
            site.render(path, &ctx)?
        };

        if self.verbose {
            output.highlight(&page.title);
            if let Some(previous) = &page.previous {
                output.note(&format!("previous: /{}", previous.request_path));
            }
            if let Some(next) = &page.next {
                output.note(&format!("next: /{}", next.request_path));
            }
        }
        output.document(page.html.trim_end())?;
        Ok(())
    }

    fn render_context(&self) -> Result<RenderContext, CliError> {
        let identity = match &self.user {
            Some(user) if user.is_empty() => {
                return Err(CliError::Validation("--user cannot be empty".to_owned()));
            }
            Some(user) => Some(Identity::new(user.as_str(), self.role.as_str())),
            None => None,
        };
        Ok(if self.print {
            RenderContext::print(identity)
        } else {
            RenderContext::online(identity)
        })
    }
}
