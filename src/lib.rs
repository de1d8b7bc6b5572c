//! # Timeline ID Worker
//!
//! Snowflake-style identifier generation for the timeline diary backend.
//!
//! Two identifier forms are served:
//!
//! - **Raw IDs**: 63-bit integers packing milliseconds since 2024-01-01,
//!   a 10-bit machine identity and a 12-bit per-millisecond sequence
//! - **Calendar IDs**: 20-digit strings like `20240615093045123007`,
//!   rendered from a raw ID for records keyed by opaque text
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Worker Service                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────────┐  ┌──────────────┐  │
//! │  │  API Layer  │  │  Service Layer  │  │   Domain     │  │
//! │  │  (Axum)     │→ │  (Generator)    │→ │   (Layout)   │  │
//! │  └─────────────┘  └─────────────────┘  └──────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::create_router;
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::service::SharedGenerator;

/// Run the identifier worker service.
///
/// This function:
/// 1. Loads configuration from `.env`, files and environment
/// 2. Configures the identifier generator
/// 3. Installs the metrics recorder
/// 4. Starts the HTTP server
/// 5. Handles graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded
/// - The machine identity is out of range
/// - HTTP server fails to bind
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Timeline ID Worker"
    );

    let generator = Arc::new(SharedGenerator::system(config.generator.machine_id)?);
    info!(
        machine_id = %generator.machine_id(),
        calendar_zone = ?config.generator.calendar_zone,
        "Generator initialized"
    );

    let mut state = AppState::new(Arc::new(config.clone()), generator);
    if config.observability.metrics_enabled {
        state = state.with_metrics(PrometheusBuilder::new().install_recorder()?);
    }

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize logging based on configuration.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.log_format == "json" {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
