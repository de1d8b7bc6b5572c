//! Configuration management module.
//!
//! Supports loading configuration from:
//! - TOML files (config/default.toml, config/{profile}.toml)
//! - Environment variables with `TIMELINE__<SECTION>__<KEY>` pattern

mod generator;
mod server;

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::MachineId;

pub use generator::{CalendarZone, GeneratorConfig};
pub use server::ServerConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Identifier generator configuration.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{TIMELINE_PROFILE}.toml` (if `TIMELINE_PROFILE` is set)
    /// 3. Environment variables with `TIMELINE__` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let profile =
            std::env::var("TIMELINE_PROFILE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            .add_source(environment())
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server.port cannot be 0".to_string()));
        }

        for origin in &self.server.allowed_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Message(format!(
                    "server.allowed_origins contains invalid origin: {origin}"
                )));
            }
        }

        MachineId::try_from(self.generator.machine_id)
            .map_err(|e| ConfigError::Message(format!("generator.machine_id: {e}")))?;

        if !matches!(self.observability.log_format.as_str(), "text" | "json") {
            return Err(ConfigError::Message(format!(
                "observability.log_format must be \"text\" or \"json\", got \"{}\"",
                self.observability.log_format
            )));
        }

        Ok(())
    }
}

/// Environment variable source.
///
/// `TIMELINE__GENERATOR__MACHINE_ID=3` sets `generator.machine_id = 3`;
/// `TIMELINE__SERVER__ALLOWED_ORIGINS=http://a,http://b` sets a two-entry list.
fn environment() -> Environment {
    Environment::with_prefix("TIMELINE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.allowed_origins")
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Install the Prometheus recorder behind `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}
