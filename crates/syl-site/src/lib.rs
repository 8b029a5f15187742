//! Course loading and two-phase page rendering for the syllabus.
//!
//! This crate provides:
//! - [`Site`]: the loaded course, rendering pages for a viewer
//! - [`Stage`]: the template environment evaluating page fragments
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use syl_config::Config;
//! use syl_renderer::{Identity, RenderContext};
//! use syl_site::{Collaborators, Site};
//!
//! let config = Config::load(None, None)?;
//! let site = Site::load(&config, Collaborators::default())?;
//!
//! let ctx = RenderContext::online(Some(Identity::new("alice", "student")));
//! let page = site.render("basics/variables", &ctx)?;
//! println!("{}", page.html);
//! # Ok(())
//! # }
//! ```

mod site;
mod stage;

pub use site::{Collaborators, NavLink, RenderedPage, Site, SiteError};
pub use stage::{Stage, StageError};
