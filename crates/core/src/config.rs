//! Configuration management for the Get Notes RAG service.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - YAML config file (`getnote.yaml` or `GETNOTE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! The resulting `AppConfig` is built once at startup and handed to each
//! component by reference; nothing reads the environment after that.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default Get Notes open API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open-api.biji.com/getnote/openapi";

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "getnote.yaml";

/// LLM providers the generation backend can be built from.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Bearer credential for the knowledge-base API
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Knowledge base (topic) identifier
    pub kb_id: Option<String>,

    /// Knowledge-base API base URL
    pub base_url: String,

    /// Search request timeout; the upstream may reason for a long time
    pub search_timeout_secs: u64,

    /// Minimum relevance score for a note to be kept
    pub relevance_threshold: f32,

    /// Default number of notes handed to the generator
    pub top_k: usize,

    /// Directory holding prompt overrides (`<id>.yml`)
    pub prompts_dir: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Append logs to this file in addition to stderr
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON
    pub log_json: bool,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Generation backend settings
    pub llm: LlmSettings,
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider name ("openai" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom endpoint; providers fall back to their public default
    pub endpoint: Option<String>,

    /// Provider API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable the API key is read from
    pub api_key_env: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            endpoint: None,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    getnote: Option<GetNoteSection>,
    retrieval: Option<RetrievalSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
    prompts: Option<PromptsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetNoteSection {
    api_key: Option<String>,
    kb_id: Option<String>,
    base_url: Option<String>,
    search_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    relevance_threshold: Option<f32>,
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    file: Option<PathBuf>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PromptsSection {
    dir: Option<PathBuf>,
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub kb_id: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_json: bool,
    pub verbose: bool,
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            api_key: None,
            kb_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_timeout_secs: 120,
            relevance_threshold: 0.7,
            top_k: 3,
            prompts_dir: None,
            log_level: None,
            log_file: None,
            log_json: false,
            verbose: false,
            no_color: false,
            llm: LlmSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// Environment variables:
    /// - `GETNOTE_CONFIG`: Path to config file
    /// - `GETNOTE_API_KEY` / `API_KEY`: Knowledge-base API key
    /// - `GETNOTE_KB_ID` / `KB_ID`: Knowledge base identifier
    /// - `GETNOTE_BASE_URL`: API base URL
    /// - `GETNOTE_LLM_PROVIDER`, `GETNOTE_LLM_MODEL`, `GETNOTE_LLM_ENDPOINT`
    /// - `OPENAI_API_KEY` (or the configured `apiKeyEnv`)
    /// - `RUST_LOG` / `LOG_LEVEL`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// Loading does not validate; call [`AppConfig::validate`] once overrides
    /// are applied.
    ///
    /// # Example
    /// ```no_run
    /// use getnote_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Knowledge base: {:?}", config.kb_id);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` as the environment lookup.
    pub fn load_with<F>(config_file: Option<PathBuf>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| env("GETNOTE_CONFIG").map(PathBuf::from));
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                Some(path)
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        if let Some(path) = config_path {
            config.merge_yaml(&path)?;
        }

        config.apply_env(&env);

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);
        self.config_file = Some(path.to_path_buf());

        if let Some(getnote) = file.getnote {
            if getnote.api_key.is_some() {
                self.api_key = getnote.api_key;
            }
            if getnote.kb_id.is_some() {
                self.kb_id = getnote.kb_id;
            }
            if let Some(base_url) = getnote.base_url {
                self.base_url = base_url;
            }
            if let Some(timeout) = getnote.search_timeout_secs {
                self.search_timeout_secs = timeout;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(threshold) = retrieval.relevance_threshold {
                self.relevance_threshold = threshold;
            }
            if let Some(top_k) = retrieval.top_k {
                self.top_k = top_k;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if llm.endpoint.is_some() {
                self.llm.endpoint = llm.endpoint;
            }
            if let Some(api_key_env) = llm.api_key_env {
                self.llm.api_key_env = api_key_env;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if llm.max_tokens.is_some() {
                self.llm.max_tokens = llm.max_tokens;
            }
            if let Some(timeout) = llm.timeout_secs {
                self.llm.timeout_secs = timeout;
            }
        }

        if let Some(logging) = file.logging {
            if logging.level.is_some() {
                self.log_level = logging.level;
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if logging.file.is_some() {
                self.log_file = logging.file;
            }
            if let Some(json) = logging.json {
                self.log_json = json;
            }
        }

        if let Some(prompts) = file.prompts {
            if prompts.dir.is_some() {
                self.prompts_dir = prompts.dir;
            }
        }

        Ok(())
    }

    /// Environment variables override YAML config.
    fn apply_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GETNOTE_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }

        if let Some(kb_id) = non_empty("GETNOTE_KB_ID").or_else(|| non_empty("KB_ID")) {
            self.kb_id = Some(kb_id);
        }

        if let Some(base_url) = non_empty("GETNOTE_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(provider) = non_empty("GETNOTE_LLM_PROVIDER") {
            self.llm.provider = provider;
        }

        if let Some(model) = non_empty("GETNOTE_LLM_MODEL") {
            self.llm.model = model;
        }

        if let Some(endpoint) = non_empty("GETNOTE_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }

        if let Some(key) = non_empty(&self.llm.api_key_env) {
            self.llm.api_key = Some(key);
        }

        if let Some(level) = non_empty("RUST_LOG").or_else(|| non_empty("LOG_LEVEL")) {
            self.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(kb_id) = overrides.kb_id {
            self.kb_id = Some(kb_id);
        }

        if let Some(provider) = overrides.provider {
            self.llm.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.llm.model = model;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if let Some(log_file) = overrides.log_file {
            self.log_file = Some(log_file);
        }

        if overrides.log_json {
            self.log_json = true;
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// The API key, or a configuration error if it is missing.
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "API key not set (GETNOTE_API_KEY or API_KEY)".to_string(),
                )
            })
    }

    /// The knowledge base id, or a configuration error if it is missing.
    pub fn require_kb_id(&self) -> AppResult<&str> {
        self.kb_id
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("Knowledge base id not set (GETNOTE_KB_ID or KB_ID)".to_string())
            })
    }

    /// Validate everything a full ask needs: retrieval and generation settings.
    ///
    /// Missing credentials are a startup-time failure, never a per-query one.
    pub fn validate(&self) -> AppResult<()> {
        self.validate_retrieval()?;
        self.validate_generation()
    }

    /// Validate the settings used by knowledge-base search only.
    pub fn validate_retrieval(&self) -> AppResult<()> {
        self.require_api_key()?;
        self.require_kb_id()?;

        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            return Err(AppError::Config(format!(
                "Relevance threshold must be within [0, 1], got {}",
                self.relevance_threshold
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Validate the text-generation backend settings.
    pub fn validate_generation(&self) -> AppResult<()> {
        let provider = self.llm.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.llm.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.llm.api_key_env
            )));
        }

        Ok(())
    }
}
