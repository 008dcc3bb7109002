//! Math Engine Binary
//!
//! Serves the deterministic trading math over HTTP/JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin math-engine
//! ```
//!
//! # Environment Variables
//!
//! - `MATH_ENGINE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use math_engine::MathEngine;
use math_engine::config::{Config, ConfigSource, config_path_from_env, load_config_or_default};
use math_engine::observability::init_tracing;
use math_engine::server::{AppState, create_router};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = config_path_from_env();
    let (config, source) = load_config_or_default(&config_path)?;
    init_tracing(&config.observability.logging)?;

    if source == ConfigSource::Defaults {
        tracing::warn!(path = %config_path, "Config file not found, using defaults");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Starting Math Engine"
    );
    log_config(&config);

    let engine = MathEngine::new(config.limits.into());
    let app = create_router(AppState::new(engine));

    let http_addr = config.server.socket_address();
    let listener = TcpListener::bind(http_addr.as_str()).await?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/math/task");
    tracing::info!("  POST /api/v1/math/parse");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Math engine stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        log_format = %config.observability.logging.format,
        max_compounding_trades = config.limits.max_compounding_trades,
        max_question_length = config.limits.max_question_length,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; a process that cannot hear
/// termination signals should not start.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
