//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// YAML seed file for the memory backend
    #[serde(default)]
    pub seed_path: Option<String>,
}

fn default_database_url() -> String {
    "postgres://postgres@localhost:5432/trivia".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/trivia.yaml")
    }

    /// Load settings from a specific configuration file path (YAML or TOML)
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Determine file format
        let format = if path.extension().map_or(false, |ext| ext == "toml") {
            FileFormat::Toml
        } else {
            FileFormat::Yaml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.request_timeout_secs", default_request_timeout())?
            .set_default("database.backend", StoreBackend::default().to_string())?
            .set_default("database.url", default_database_url())?
            .set_default("database.max_connections", default_max_connections())?
            .set_default("database.acquire_timeout_secs", default_acquire_timeout())?
            .set_default("cors.enabled", true)?
            .set_default("cors.allowed_origins", default_allowed_origins())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("TRIVIA_API")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        );

        let config = config_builder.build()?;
        let mut settings: Settings = config.try_deserialize()?;

        // Conventional override used by hosting platforms
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database.url = url;
        }

        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.database.backend == StoreBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Database url is required for the postgres backend".to_string(),
            )));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Database max_connections must be at least 1".to_string(),
            )));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Unknown logging format '{}'",
                self.logging.format
            ))));
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            database: DatabaseConfig::default(),
            cors: CorsConfig {
                enabled: true,
                allowed_origins: default_allowed_origins(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            seed_path: None,
        }
    }
}
