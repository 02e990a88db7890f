//! Platform subscription verification.
//!
//! When a webhook subscription is created, the platform probes the
//! endpoint with `hub.mode=subscribe`, a verify token, and a one-time
//! challenge. Proving ownership requires echoing the challenge back
//! byte-identically with a 200. Everything else gets a flat 403.

use axum::http::StatusCode;

/// Answer a subscription verification probe.
///
/// Pure gate: no retry, no side effects. The token comparison is
/// constant-time so response timing leaks nothing about the secret.
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    secret: &str,
) -> (StatusCode, String) {
    let token_matches = token.is_some_and(|t| constant_time_compare(t, secret));

    if mode == Some("subscribe") && token_matches {
        (StatusCode::OK, challenge.unwrap_or_default().to_string())
    } else {
        (StatusCode::FORBIDDEN, "Forbidden".to_string())
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
