//! Configuration management for KB.
//!
//! Parses `kb.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[github]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! An empty token after expansion means unauthenticated requests.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kb.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub token: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream repository.
    pub github: GithubConfig,
    /// Content layout and caching.
    pub content: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Repository coordinates and API access.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Personal access token. Absent or empty means unauthenticated.
    pub token: Option<String>,
    /// Base URL of the REST API.
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: "FrontendKnowledgeBase".to_owned(),
            repo: "FrontendCompetencies".to_owned(),
            branch: "main".to_owned(),
            token: None,
            api_url: "https://api.github.com".to_owned(),
        }
    }
}

impl GithubConfig {
    /// Token to send, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Content layout and caching.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding one subdirectory per category.
    pub root: String,
    /// Path of the site-wide README.
    pub readme: String,
    /// Seconds before a cached upstream response goes stale.
    pub cache_ttl_secs: u64,
    /// Category title overrides.
    pub title_overrides: Vec<TitleOverrideConfig>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "articles".to_owned(),
            readme: "README.md".to_owned(),
            cache_ttl_secs: 300,
            title_overrides: vec![TitleOverrideConfig {
                category: "networking".to_owned(),
                title: "Сетевые технологии".to_owned(),
                replaces: Some("Браузер".to_owned()),
            }],
        }
    }
}

impl ContentConfig {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// A `[[content.title_overrides]]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TitleOverrideConfig {
    /// Category id the override applies to.
    pub category: String,
    pub title: String,
    /// Only replace this derived title, when set.
    #[serde(default)]
    pub replaces: Option<String>,
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
        /// Config field path (e.g., "`github.token`").
        field: String,
        /// Error message (e.g., "${`GITHUB_TOKEN`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
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
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `kb.toml` in the current directory and its
    /// parents, falling back to defaults.
    ///
    /// CLI settings are applied after loading and validated together with
    /// the file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns error on I/O, TOML, expansion or validation failure.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(owner) = &settings.owner {
            self.github.owner.clone_from(owner);
        }
        if let Some(repo) = &settings.repo {
            self.github.repo.clone_from(repo);
        }
        if let Some(branch) = &settings.branch {
            self.github.branch.clone_from(branch);
        }
        if let Some(token) = &settings.token {
            self.github.token = Some(token.clone());
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.github.owner, "github.owner")?;
        require_non_empty(&self.github.repo, "github.repo")?;
        require_non_empty(&self.github.branch, "github.branch")?;
        require_http_url(&self.github.api_url, "github.api_url")?;
        require_non_empty(&self.content.root, "content.root")?;
        require_non_empty(&self.content.readme, "content.readme")?;

        if self.content.cache_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "content.cache_ttl_secs must be greater than 0".to_owned(),
            ));
        }

        for (i, entry) in self.content.title_overrides.iter().enumerate() {
            require_non_empty(&entry.category, &format!("content.title_overrides[{i}].category"))?;
            require_non_empty(&entry.title, &format!("content.title_overrides[{i}].title"))?;
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let github = &mut self.github;
        github.owner = expand::expand_env(&github.owner, "github.owner")?;
        github.repo = expand::expand_env(&github.repo, "github.repo")?;
        github.branch = expand::expand_env(&github.branch, "github.branch")?;
        github.api_url = expand::expand_env(&github.api_url, "github.api_url")?;
        if let Some(token) = &github.token {
            github.token = Some(expand::expand_env(token, "github.token")?);
        }
        Ok(())
    }
}

/// Search for `kb.toml` in `start` and its parents.
#[must_use]
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
