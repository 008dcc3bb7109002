//! Structured logging setup.
//!
//! `RUST_LOG` wins over the configured level when it is set and valid.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LoggingConfig;

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Filter from `RUST_LOG`, or from `level` when `RUST_LOG` is unset or invalid.
pub fn build_filter(level: &str) -> Result<EnvFilter, TracingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(level).map_err(|e| TracingError::InvalidFilter {
            directive: level.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Install the global subscriber.
///
/// `json` emits one JSON object per event (with the current span and span
/// list when `include_spans` is set); `pretty` emits multi-line human output.
///
/// # Errors
///
/// An invalid level, or a subscriber that is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = build_filter(&config.level)?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.format == "pretty" {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TracingError::SubscriberError(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        include_spans = config.include_spans,
        "Logging initialized"
    );
    Ok(())
}
