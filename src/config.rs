use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port, shared by the HTTP API and the websocket endpoint
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated
    pub cors_origins: Option<String>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Endpoint of the external code runner (`POST {code, languageId}`)
    pub runner_url: Option<String>,

    #[serde(default = "default_runner_timeout_secs")]
    pub runner_timeout_secs: u64,

    /// How long a typing indicator counts as live without a refresh
    #[serde(default = "default_typing_timeout_ms")]
    pub typing_timeout_ms: u64,

    /// Language whose sample seeds a new room when the creator names none
    #[serde(default = "default_language_id")]
    pub default_language_id: u32,

    /// Events a connection may have queued before it is dropped as too slow
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        envy::from_env::<Config>().map_err(ConfigError::EnvError)
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    /// Origins allowed by CORS. Empty means none were configured.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!(
            "colab_room={},tower_http=debug,axum::rejection=trace,info",
            self.log_level
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            log_level: default_log_level(),
            service_name: default_service_name(),
            runner_url: None,
            runner_timeout_secs: default_runner_timeout_secs(),
            typing_timeout_ms: default_typing_timeout_ms(),
            default_language_id: default_language_id(),
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "colab-room".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_runner_timeout_secs() -> u64 {
    10
}

fn default_typing_timeout_ms() -> u64 {
    2000
}

fn default_language_id() -> u32 {
    crate::ws::samples::PYTHON
}

fn default_outbox_capacity() -> usize {
    crate::ws::DEFAULT_OUTBOX_CAPACITY
}
