//! Delivery outcome types.

use axum::http::StatusCode;

/// Terminal result of handling one inbound notification.
///
/// Returned synchronously to the inbound caller as the HTTP response to
/// the original webhook request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The destination produced an HTTP response (any status, including
    /// >= 400). Delivery is transport-level; downstream application
    /// errors are the destination's problem, not ours.
    Forwarded { target: String, target_status: u16 },
    /// The identifier is not registered. Expected, non-error condition:
    /// the platform must see a 200 or it will retry aggressively.
    Ignored { reason: String },
    /// The inbound payload was structurally unusable. Client error,
    /// never retried.
    Rejected { reason: String },
    /// All forward attempts exhausted without reaching the destination.
    Failed { reason: String },
}

impl DeliveryOutcome {
    /// HTTP status to answer the inbound caller with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeliveryOutcome::Forwarded { .. } => StatusCode::OK,
            DeliveryOutcome::Ignored { .. } => StatusCode::OK,
            DeliveryOutcome::Rejected { .. } => StatusCode::BAD_REQUEST,
            DeliveryOutcome::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
