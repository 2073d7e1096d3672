//! Application configuration
//!
//! Settings come from an optional TOML file (path in `SPARKLEARN_CONFIG`),
//! then environment variables override individual keys. The API credential
//! is only ever read from the environment.
//!
//! # Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! session_idle_secs = 1800
//!
//! [llm]
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! ```

pub mod persona;

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credential variable read when the file does not name one
const DEFAULT_API_KEY_ENV: &str = "API_KEY";
const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are dropped
    pub session_idle: Duration,
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl Config {
    /// Load configuration for the running process.
    ///
    /// Fails when no credential is present; the server cannot answer
    /// anything without one.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("SPARKLEARN_CONFIG") {
            Ok(path) => FileConfig::from_file(Path::new(&path))?,
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |key| env::var(key).ok())
    }

    /// Merge file settings with values looked up through `var`.
    pub fn resolve(
        file: FileConfig,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Validation(format!("invalid PORT: {raw}")))?,
            None => file.server.port,
        };

        let idle_secs = match var("SESSION_IDLE_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Validation(format!("invalid SESSION_IDLE_SECS: {raw}")))?,
            None => file.server.session_idle_secs,
        };
        if idle_secs == 0 {
            return Err(ConfigError::Validation(
                "session idle timeout must be at least one second".to_string(),
            ));
        }

        let api_key = match file.llm.api_key_env.as_deref() {
            Some(name) => var(name).ok_or_else(|| ConfigError::MissingCredential(name.to_string()))?,
            None => var(DEFAULT_API_KEY_ENV)
                .or_else(|| var(FALLBACK_API_KEY_ENV))
                .ok_or_else(|| ConfigError::MissingCredential(DEFAULT_API_KEY_ENV.to_string()))?,
        };
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                file.llm.api_key_env.unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            ));
        }

        Ok(Self {
            host: var("HOST").unwrap_or(file.server.host),
            port,
            session_idle: Duration::from_secs(idle_secs),
            api_key,
            model: var("GEMINI_MODEL").unwrap_or(file.llm.model),
            api_base: var("GEMINI_API_BASE")
                .or(file.llm.endpoint)
                .unwrap_or_else(default_api_base)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// On-disk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Custom API base URL
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: None,
            endpoint: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
