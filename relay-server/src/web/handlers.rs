//! HTTP endpoint handlers.
//!
//! Handlers are request-scoped and stateless: everything they need is in
//! `AppState`, which is read-only after startup. The only await of
//! consequence is the outbound forward inside `POST /webhook`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::forward::{DeliveryOutcome, Forwarder};
use crate::routing::RoutingTable;
use crate::web::verify::verify_subscription;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub table: Arc<RoutingTable>,
    pub forwarder: Arc<Forwarder>,
}

impl AppState {
    pub fn new(config: Config, table: RoutingTable, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            table: Arc::new(table),
            forwarder: Arc::new(forwarder),
        }
    }
}

// =============================================================================
// Service Descriptor
// =============================================================================

#[derive(Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub routes_count: usize,
    pub endpoints: ServiceEndpoints,
}

#[derive(Serialize)]
pub struct ServiceEndpoints {
    pub webhook: &'static str,
    pub health: &'static str,
    pub admin: &'static str,
}

/// Root endpoint: static service descriptor.
pub async fn home(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: "webhook-relay",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        routes_count: state.table.len(),
        endpoints: ServiceEndpoints {
            webhook: "/webhook (GET/POST)",
            health: "/health",
            admin: "/admin/restaurants?admin_token=xxx",
        },
    })
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub routes_count: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        routes_count: state.table.len(),
    })
}

// =============================================================================
// Webhook Verification (GET)
// =============================================================================

/// Query parameters of the platform's verification probe.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Subscription verification endpoint.
///
/// Echoes the challenge as plain text on success; the platform requires a
/// byte-identical echo, so no JSON wrapping here.
pub async fn webhook_verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> (StatusCode, String) {
    info!(mode = ?params.mode, "webhook_verification_request");

    let (status, body) = verify_subscription(
        params.mode.as_deref(),
        params.verify_token.as_deref(),
        params.challenge.as_deref(),
        &state.config.verify_token,
    );

    if status == StatusCode::OK {
        info!("webhook_verified");
    } else {
        warn!("webhook_verification_failed");
    }

    (status, body)
}

// =============================================================================
// Webhook Receive (POST)
// =============================================================================

/// Response to the inbound webhook caller.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_status: Option<u16>,
}

/// Notification receive endpoint.
///
/// The body is taken as raw bytes so the payload reaches the destination
/// byte-for-byte; dispatch parses a copy only to extract the routing
/// identifier.
pub async fn webhook_receive(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let outcome = dispatch(&state.table, &state.forwarder, &body).await;
    let status = outcome.status_code();

    let response = match outcome {
        DeliveryOutcome::Forwarded {
            target,
            target_status,
        } => WebhookResponse {
            status: "forwarded",
            message: None,
            target: Some(target),
            target_status: Some(target_status),
        },
        DeliveryOutcome::Ignored { reason } => WebhookResponse {
            status: "ignored",
            message: Some(reason),
            target: None,
            target_status: None,
        },
        DeliveryOutcome::Rejected { reason } | DeliveryOutcome::Failed { reason } => {
            WebhookResponse {
                status: "error",
                message: Some(reason),
                target: None,
                target_status: None,
            }
        }
    };

    (status, Json(response))
}

// =============================================================================
// Admin Route Listing
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AdminParams {
    pub admin_token: Option<String>,
}

#[derive(Serialize)]
pub struct RouteInfo {
    pub page_id: String,
    pub destination: String,
}

#[derive(Serialize)]
pub struct RouteListResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteInfo>>,
}

/// Admin endpoint listing every registered destination.
///
/// Discloses the entire routing table; gated by the admin shared secret.
pub async fn admin_restaurants(
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
) -> (StatusCode, Json<RouteListResponse>) {
    let authorized = params
        .admin_token
        .as_deref()
        .is_some_and(|t| t == state.config.admin_token);

    if !authorized {
        warn!("admin_restaurants_unauthorized");
        return (
            StatusCode::FORBIDDEN,
            Json(RouteListResponse {
                status: "error",
                message: Some("Unauthorized"),
                count: None,
                routes: None,
            }),
        );
    }

    let routes: Vec<RouteInfo> = state
        .table
        .iter()
        .map(|(page_id, destination)| RouteInfo {
            page_id: page_id.to_string(),
            destination: destination.to_string(),
        })
        .collect();

    info!(count = routes.len(), "admin_restaurants_listed");

    (
        StatusCode::OK,
        Json(RouteListResponse {
            status: "success",
            message: None,
            count: Some(routes.len()),
            routes: Some(routes),
        }),
    )
}
