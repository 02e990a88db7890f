//! Webhook relay server.
//!
//! Startup sequence:
//! - Initialize structured JSON logging
//! - Load configuration from the environment
//! - Build the immutable routing table (degrading to empty on bad config)
//! - Serve the relay endpoints until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay::web::AppState;
use relay::{Config, Forwarder, RoutingTable};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        forward_timeout_secs = config.forward_timeout_secs,
        max_retries = config.max_retries,
        "config_loaded"
    );

    // Build the routing table once; it is immutable for the process
    // lifetime. A malformed ROUTE_MAP degrades to an empty table.
    let table = RoutingTable::from_json(&config.route_map_json);
    if table.is_empty() {
        error!("routing_table_empty_no_destinations_known");
    } else {
        info!(routes = table.len(), "routing_table_loaded");
    }

    let forwarder = Forwarder::new(
        config.max_retries,
        Duration::from_secs(config.forward_timeout_secs),
    );

    // Create application state
    let port = config.port;
    let state = AppState::new(config, table, forwarder);

    // Build the router
    let app = relay::web::router(state).layer(TraceLayer::new_for_http());

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_server_shutting_down");
}
