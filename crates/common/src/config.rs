use crate::error::StudyCompanionError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Study Companion application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI API key
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Chat model name
    pub openai_model: String,

    /// OpenAI-compatible API base URL
    pub openai_base_url: String,

    /// Per-request timeout for LLM calls in seconds
    pub openai_timeout_secs: u64,

    /// Retries for transient provider failures
    pub openai_max_retries: u32,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Directory holding index.html
    pub static_dir: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_timeout_secs: 120,
            openai_max_retries: 2,
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            static_dir: PathBuf::from("./static"),
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, StudyCompanionError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            openai_api_key: Self::get_env_non_empty("OPENAI_API_KEY"),
            openai_model: Self::get_env_non_empty("OPENAI_MODEL")
                .unwrap_or(defaults.openai_model),
            openai_base_url: Self::get_env_non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            openai_timeout_secs: Self::get_env_parsed("OPENAI_TIMEOUT_SECS")
                .unwrap_or(defaults.openai_timeout_secs),
            openai_max_retries: Self::get_env_parsed("OPENAI_MAX_RETRIES")
                .unwrap_or(defaults.openai_max_retries),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            static_dir: Self::get_env_path("STATIC_DIR").unwrap_or(defaults.static_dir),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get a non-blank string from environment variable
    fn get_env_non_empty(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get full path of the landing page
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), StudyCompanionError> {
        if self.openai_model.trim().is_empty() {
            return Err(StudyCompanionError::config("OpenAI model name cannot be empty"));
        }

        if !self.openai_base_url.starts_with("http://")
            && !self.openai_base_url.starts_with("https://")
        {
            return Err(StudyCompanionError::config(
                "OpenAI base URL must start with http:// or https://",
            ));
        }

        if self.server_port == 0 {
            return Err(StudyCompanionError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
