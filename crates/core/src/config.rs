//! Configuration management for websage.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (.websage/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Credentials are never stored in the file itself. The file names the
//! environment variable that holds each API key, and the key is resolved
//! once when the clients are constructed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.bochaai.com/v1/web-search";

/// Default OpenAI-compatible model endpoint.
pub const DEFAULT_MODEL_ENDPOINT: &str = "https://api.deepseek.com";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .websage/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Web search service settings
    pub search: SearchSettings,

    /// Chat-completion service settings
    pub model: ModelSettings,

    /// Language of the answer prompt template
    pub prompt_language: PromptLanguage,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Search service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Full URL of the web-search endpoint
    pub endpoint: String,

    /// Environment variable holding the bearer token
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Request timeout in seconds (none by default)
    pub timeout: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key_env: "WEBSAGE_SEARCH_API_KEY".to_string(),
            timeout: None,
        }
    }
}

/// Model service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Environment variable holding the bearer token
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Model used for the standard variant
    #[serde(rename = "standardModel")]
    pub standard_model: String,

    /// Model used for the reasoning variant
    #[serde(rename = "reasoningModel")]
    pub reasoning_model: String,

    /// Request timeout in seconds (none by default)
    pub timeout: Option<u64>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            api_key_env: "WEBSAGE_MODEL_API_KEY".to_string(),
            standard_model: "deepseek-chat".to_string(),
            reasoning_model: "deepseek-reasoner".to_string(),
            timeout: None,
        }
    }
}

/// Language of the fixed answer template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    Zh,
    En,
}

impl PromptLanguage {
    /// Parse a language tag from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zh" | "cn" | "chinese" => Some(Self::Zh),
            "en" | "english" => Some(Self::En),
            _ => None,
        }
    }

    /// Get the canonical language tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchSettings>,
    model: Option<ModelSettings>,
    prompt: Option<PromptConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptConfig {
    language: Option<PromptLanguage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            search: SearchSettings::default(),
            model: ModelSettings::default(),
            prompt_language: PromptLanguage::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `WEBSAGE_WORKSPACE`: Override workspace path
    /// - `WEBSAGE_CONFIG`: Path to config file
    /// - `WEBSAGE_SEARCH_ENDPOINT`: Search endpoint URL
    /// - `WEBSAGE_MODEL_ENDPOINT`: Model API base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use websage_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Search endpoint: {}", config.search.endpoint);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration, letting explicit paths win over the environment.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace
            .or_else(|| std::env::var("WEBSAGE_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file = config_file
            .or_else(|| std::env::var("WEBSAGE_CONFIG").ok().map(PathBuf::from));

        // Validate workspace exists
        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!("Config file not found: {:?}", cf)));
                }
                cf.clone()
            }
            None => config.websage_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(endpoint) = std::env::var("WEBSAGE_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        if let Ok(endpoint) = std::env::var("WEBSAGE_MODEL_ENDPOINT") {
            config.model.endpoint = endpoint;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);

        Ok(self.merge(config_file))
    }

    fn merge(&self, config_file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(model) = config_file.model {
            result.model = model;
        }

        if let Some(language) = config_file.prompt.and_then(|p| p.language) {
            result.prompt_language = language;
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over both the file and the environment.
    pub fn with_overrides(
        mut self,
        prompt_language: Option<PromptLanguage>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(language) = prompt_language {
            self.prompt_language = language;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .websage directory.
    pub fn websage_dir(&self) -> PathBuf {
        self.workspace.join(".websage")
    }

    /// Resolve the search API key from its environment variable.
    pub fn resolve_search_key(&self) -> AppResult<String> {
        resolve_key(&self.search.api_key_env)
    }

    /// Resolve the model API key from its environment variable.
    pub fn resolve_model_key(&self) -> AppResult<String> {
        resolve_key(&self.model.api_key_env)
    }

    /// Validate endpoints, model names and credentials.
    pub fn validate(&self) -> AppResult<()> {
        self.validate_search()?;
        validate_endpoint("model", &self.model.endpoint)?;

        if self.model.standard_model.trim().is_empty()
            || self.model.reasoning_model.trim().is_empty()
        {
            return Err(AppError::Config(
                "Both standardModel and reasoningModel must be set".to_string(),
            ));
        }

        self.resolve_model_key()?;

        Ok(())
    }

    /// Validate only what a search-only run needs.
    pub fn validate_search(&self) -> AppResult<()> {
        validate_endpoint("search", &self.search.endpoint)?;
        self.resolve_search_key()?;
        Ok(())
    }
}

fn resolve_key(env_var: &str) -> AppResult<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AppError::Config(format!(
            "API key not found in environment variable: {}",
            env_var
        ))),
    }
}

fn validate_endpoint(name: &str, endpoint: &str) -> AppResult<()> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "Invalid {} endpoint: {}. Expected an http(s) URL",
            name, endpoint
        )))
    }
}
