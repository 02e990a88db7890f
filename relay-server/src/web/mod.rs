//! Web server module: HTTP handlers and the verification gate.
//!
//! Endpoints:
//! - `GET /` service descriptor
//! - `GET /health` liveness probe
//! - `GET /webhook` subscription verification
//! - `POST /webhook` notification dispatch + forward
//! - `GET /admin/restaurants` routing-table listing (secret-gated)

pub mod handlers;
pub mod verify;

use axum::{routing::get, Router};

pub use handlers::{
    admin_restaurants, health, home, webhook_receive, webhook_verify, AppState, HealthResponse,
    VerifyParams, WebhookResponse,
};
pub use verify::verify_subscription;

/// Build the relay's router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/webhook", get(webhook_verify).post(webhook_receive))
        .route("/admin/restaurants", get(admin_restaurants))
        .with_state(state)
}
