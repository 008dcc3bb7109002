//! Configuration loading for the math engine.
//!
//! YAML with `${VAR}` / `${VAR:-default}` interpolation, serde defaults for
//! every field, and validation after parsing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use math_engine::config::load_config_or_default;
//!
//! let (config, _source) = load_config_or_default("config.yaml")?;
//! println!("HTTP port: {}", config.server.http_port);
//! # Ok::<(), math_engine::config::ConfigError>(())
//! ```

mod limits;
mod observability;
mod server;

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use limits::{LimitsConfig, MAX_COMPOUNDING_TRADES_CEILING};
pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};
pub use server::ServerConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MATH_ENGINE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Per-request work limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Config path from [`CONFIG_PATH_ENV`], falling back to [`DEFAULT_CONFIG_PATH`].
#[must_use]
pub fn config_path_from_env() -> String {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    load_config_from_string(&contents)
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the requested file.
    File,
    /// The file does not exist; built-in defaults are in effect.
    Defaults,
}

/// Like [`load_config`], but a missing file yields the defaults.
///
/// Callers should warn on [`ConfigSource::Defaults`] once logging is up.
///
/// # Errors
///
/// Any read error other than "not found", and any parse or validation error.
pub fn load_config_or_default(
    path: impl AsRef<Path>,
) -> Result<(Config, ConfigSource), ConfigError> {
    match load_config(path.as_ref()) {
        Ok(config) => Ok((config, ConfigSource::File)),
        Err(ConfigError::ReadError { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Ok((Config::default(), ConfigSource::Defaults))
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    if config.server.bind_address.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "server.bind_address must not be empty".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    let trades = config.limits.max_compounding_trades;
    if trades == 0 || trades > MAX_COMPOUNDING_TRADES_CEILING {
        return Err(ConfigError::ValidationError(format!(
            "limits.max_compounding_trades must be between 1 and {MAX_COMPOUNDING_TRADES_CEILING}"
        )));
    }

    if config.limits.max_question_length == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_question_length must be positive".to_string(),
        ));
    }

    Ok(())
}
