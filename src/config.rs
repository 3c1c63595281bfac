//! # Configuration
//!
//! Layered settings for the server binary.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. optional `config/shipquote.toml`
//! 3. `SHIPQUOTE_*` environment variables, `__` separating nested keys
//!    (`SHIPQUOTE_SERVER__PORT=8080`, `SHIPQUOTE_LOG__FORMAT=json`)
//!
//! A `.env` file in the working directory is read into the environment
//! before the sources are merged.

use crate::api::rest::CrudOperation;
use crate::infrastructure::fixtures::FixtureEndpoints;
use config::{Config, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default settings file, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "config/shipquote";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SHIPQUOTE";

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Quote fan-out and pricing.
    pub quoting: QuotingConfig,
    /// Log output.
    pub log: LogConfig,
    /// Demo data.
    pub fixtures: FixturesConfig,
    /// REST surface.
    pub api: ApiConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Quote fan-out and pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotingConfig {
    /// Ceiling for one provider, in milliseconds.
    pub provider_timeout_ms: u64,
    /// Markup percentage applied when no pricing rule matches.
    pub default_markup: Decimal,
}

impl Default for QuotingConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 5000,
            default_markup: Decimal::from(15),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
        }
    }
}

/// Demo data settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Seed the stores at startup.
    pub enabled: bool,
    /// Carrier endpoints of the seeded providers.
    pub endpoints: FixtureEndpoints,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoints: FixtureEndpoints::default(),
        }
    }
}

/// REST surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// CRUD operations served on `/api/shipping-providers`.
    pub provider_operations: Vec<CrudOperation>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider_operations: CrudOperation::ALL.to_vec(),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the default settings file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value is
    /// out of range.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads the settings file at `path` (optional) and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value is
    /// out of range.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(environment())
            .build()?;
        Self::finish(config)
    }

    /// Parses a TOML document on top of the defaults. Environment
    /// variables are not consulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the document is invalid or a value is out
    /// of range.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks value ranges the types cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quoting.provider_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "quoting.provider_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.quoting.default_markup.is_sign_negative() {
            return Err(ConfigError::Message(
                "quoting.default_markup must not be negative".to_string(),
            ));
        }
        if self.api.provider_operations.is_empty() {
            return Err(ConfigError::Message(
                "api.provider_operations must enable at least one operation".to_string(),
            ));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("api.provider_operations")
}
