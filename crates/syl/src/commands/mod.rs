//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod toc;

use std::path::{Path, PathBuf};

use syl_config::{CliSettings, Config};

pub(crate) use render::RenderArgs;
pub(crate) use toc::TocArgs;

use crate::error::CliError;

/// Load configuration with command line overrides.
fn load_config(
    config: Option<&Path>,
    source_dir: Option<PathBuf>,
    course_url: Option<String>,
) -> Result<Config, CliError> {
    let settings = CliSettings {
        source_dir,
        course_url,
    };
    Ok(Config::load(config, Some(&settings))?)
}
