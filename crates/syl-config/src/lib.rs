//! Configuration management for the syllabus.
//!
//! Parses `syllabus.toml` with serde and searches parent directories for it
//! when no explicit path is given. CLI settings are applied after loading
//! via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These string values support `${VAR}` and `${VAR:-default}`:
//!
//! - `grader.course_url`
//! - `lti.launch_url`
//! - `lti.consumer_key`
//! - `lti.consumer_secret`
//!
//! ## Submission protocol
//!
//! The presence of an `[lti]` section selects the LMS launch protocol for
//! exercises. Without it, exercises post directly to `grader.course_url`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "syllabus.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override grading service URL.
    pub course_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content locations (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Grading service configuration.
    pub grader: GraderConfig,
    /// LMS launch configuration; selects the LTI protocol when present.
    pub lti: Option<LtiConfig>,
    /// User-facing strings emitted by directives.
    pub labels: Labels,
    /// Render pipeline limits.
    pub render: RenderConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    declaration: Option<String>,
}

/// Resolved content locations.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding page markup sources.
    pub source_dir: PathBuf,
    /// YAML course declaration file.
    pub declaration: PathBuf,
}

/// Grading service configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Course URL exercises are posted to.
    pub course_url: String,
    /// Post through a same-origin proxy instead of the course URL.
    pub same_origin_proxy: bool,
    /// Path of the same-origin proxy.
    pub proxy_path: String,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            course_url: String::new(),
            same_origin_proxy: false,
            proxy_path: "/postinginious".to_owned(),
        }
    }
}

impl GraderConfig {
    /// URL exercise forms post to.
    #[must_use]
    pub fn submission_url(&self) -> &str {
        if self.same_origin_proxy {
            &self.proxy_path
        } else {
            &self.course_url
        }
    }
}

/// LTI 1.1 launch configuration.
#[derive(Debug, Deserialize)]
pub struct LtiConfig {
    /// Tool launch endpoint.
    pub launch_url: String,
    /// OAuth consumer key.
    pub consumer_key: String,
    /// OAuth consumer secret.
    pub consumer_secret: String,
    /// LTI `context_id` sent with every launch.
    #[serde(default = "default_context_id")]
    pub context_id: String,
}

fn default_context_id() -> String {
    "syllabus".to_owned()
}

impl LtiConfig {
    /// Validate that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or the launch
    /// URL is not an http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.launch_url, "lti.launch_url")?;
        require_http_url(&self.launch_url, "lti.launch_url")?;
        require_non_empty(&self.consumer_key, "lti.consumer_key")?;
        require_non_empty(&self.consumer_secret, "lti.consumer_secret")?;
        require_non_empty(&self.context_id, "lti.context_id")?;
        Ok(())
    }
}

/// User-facing strings emitted by directives.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Exercise submit button.
    pub submit: String,
    /// Placeholder shown to anonymous visitors in LTI mode.
    pub login_required: String,
    /// Placeholder shown when an LTI launch cannot be prepared.
    pub unavailable: String,
    /// Prefix of the author line.
    pub authors: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            submit: "Submit".to_owned(),
            login_required: "Please log in to work on this exercise.".to_owned(),
            unavailable: "This exercise is currently unavailable.".to_owned(),
            authors: "Author(s)".to_owned(),
        }
    }
}

/// Render pipeline limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum depth of directives nested inside directive content.
    pub max_nesting_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 10,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`lti.consumer_secret`").
        field: String,
        /// Error message.
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `syllabus.toml` in the current directory and its parents, falling
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.declaration = source_dir.join(
                self.content
                    .declaration
                    .as_deref()
                    .unwrap_or("content.yaml"),
            );
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(course_url) = &settings.course_url {
            self.grader.course_url.clone_from(course_url);
        }
    }

    /// Validated LTI configuration, if the `[lti]` section is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is present but invalid.
    pub fn lti(&self) -> Result<Option<&LtiConfig>, ConfigError> {
        match &self.lti {
            Some(lti) => {
                lti.validate()?;
                Ok(Some(lti))
            }
            None => Ok(None),
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        let source_dir = base.join("pages");
        Self {
            content: ContentConfigRaw::default(),
            grader: GraderConfig::default(),
            lti: None,
            labels: Labels::default(),
            render: RenderConfig::default(),
            content_resolved: ContentConfig {
                declaration: source_dir.join("content.yaml"),
                source_dir,
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grader.course_url.is_empty() {
            require_http_url(&self.grader.course_url, "grader.course_url")?;
        }
        if self.grader.same_origin_proxy && !self.grader.proxy_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "grader.proxy_path must start with /".to_owned(),
            ));
        }
        if let Some(lti) = &self.lti {
            lti.validate()?;
        }
        if self.render.max_nesting_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_nesting_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.grader.course_url = expand::expand_env(&self.grader.course_url, "grader.course_url")?;

        if let Some(ref mut lti) = self.lti {
            lti.launch_url = expand::expand_env(&lti.launch_url, "lti.launch_url")?;
            lti.consumer_key = expand::expand_env(&lti.consumer_key, "lti.consumer_key")?;
            lti.consumer_secret =
                expand::expand_env(&lti.consumer_secret, "lti.consumer_secret")?;
        }

        Ok(())
    }

    /// Resolve content paths relative to the config file directory.
    ///
    /// The declaration path is relative to the source directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = config_dir.join(self.content.source_dir.as_deref().unwrap_or("pages"));
        let declaration = source_dir.join(
            self.content
                .declaration
                .as_deref()
                .unwrap_or("content.yaml"),
        );
        self.content_resolved = ContentConfig {
            source_dir,
            declaration,
        };
    }
}
