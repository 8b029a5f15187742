//! `syl toc` command implementation.

use std::path::PathBuf;

use clap::Args;
use syl_site::{Collaborators, Site};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    /// Path to configuration file (default: auto-discover syllabus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Course source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl TocArgs {
    /// Execute the toc command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the declaration is invalid.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = super::load_config(self.config.as_deref(), self.source_dir, None)?;
        let site = Site::load(&config, Collaborators::default())?;

        for (depth, node) in site.tree().walk() {
            let marker = if node.is_chapter() { "+" } else { "-" };
            output.document(&format!(
                "{indent}{marker} {title} (/{path})",
                indent = "  ".repeat(depth),
                title = node.title(),
                path = node.request_path(),
            ))?;
        }
        Ok(())
    }
}
