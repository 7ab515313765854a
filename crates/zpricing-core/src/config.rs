//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Values are layered: built-in defaults, then `config/default` and
//! `config/{RUN_MODE}` files, then `ZPRICING__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use tracing::debug;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Billing catalog query endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the billing REST endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session token issued by the billing platform's login call
    pub session_token: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on `queryMore` pages followed for one statement
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_base_url() -> String {
    "https://apisandbox.zuora.com/rest/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_pages() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_token: None,
            timeout_ms: default_timeout_ms(),
            max_pages: default_max_pages(),
        }
    }
}

/// Resolution defaults
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    /// Currency used when the caller does not name one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

/// Logging output
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        debug!("Loading configuration for run mode '{}'", run_mode);

        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// `ZPRICING__SECTION__KEY` variables, e.g. `ZPRICING__API__TIMEOUT_MS=5000`
    fn environment() -> Environment {
        Environment::with_prefix("ZPRICING")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_ms", default_timeout_ms() as i64)?
            .set_default("api.max_pages", default_max_pages() as i64)?
            .set_default("pricing.default_currency", default_currency())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)
    }
}
