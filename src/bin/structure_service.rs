//! Structure Pipeline Service Binary
//!
//! Runs the structure pipeline as a REST API service:
//! - Structured JSON logging
//! - Request tracing with correlation IDs
//! - Graceful shutdown handling
//! - Health check endpoints
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT`: Service port (default: 8000)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `HEAVY_ATOM_CEILING`: Generation cap (default: 10)
//! - `MAX_STEREO_CENTERS`: Stereo expansion cap (default: 10)
//! - `EMBED_SEED`: 3D embedding seed (default: 42)
//! - `EMBED_MAX_STEPS`: Refinement step ceiling (default: 200)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! PORT=8000 cargo run --bin structure_service --features service
//! ```

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use structure_pipeline::service::{create_router, AppState};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "structure_pipeline=info,tower_http=info".into());

    if log_format == "pretty" {
        // Pretty format for local development
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .init();
    } else {
        // JSON format for production
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting Structure Pipeline Service");

    let state = AppState::from_env();
    let config = state.pipeline.config().clone();
    let fingerprints = state.pipeline.rule_fingerprints();
    info!(
        heavy_atom_ceiling = config.heavy_atom_ceiling,
        max_stereo_centers = config.max_stereo_centers,
        embed_seed = config.embed_seed,
        embed_max_steps = config.embed_max_steps,
        standardization_rules = %fingerprints.standardization,
        sugar_rules = %fingerprints.sugar_rules,
        palette = %fingerprints.palette,
        "Pipeline configured"
    );

    // Build router with middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        version = version,
        "Structure Pipeline Service listening"
    );

    let listener = TcpListener::bind(addr).await?;

    // Graceful shutdown handling
    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
            _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
        }
    };

    info!("Ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Structure Pipeline Service shutdown complete");

    Ok(())
}
