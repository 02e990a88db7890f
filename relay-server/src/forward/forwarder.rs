//! Bounded-retry payload forwarding.
//!
//! The forwarder's contract is transport delivery, not application
//! success: any HTTP response from the destination completes the
//! delivery immediately, while timeouts and connection-level failures
//! retry up to the configured maximum before surfacing as `Failed`.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use super::types::DeliveryOutcome;

/// Header attached to every outbound request so destinations can tell
/// relayed traffic from direct platform traffic.
pub const FORWARDED_BY_HEADER: &str = "X-Forwarded-By";
pub const FORWARDED_BY_VALUE: &str = "webhook-relay";

/// One attempt either reaches the destination or fails at the transport
/// level. Timeouts are classified separately because they get their own
/// terminal failure reason.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("target server timeout")]
    Timeout,
    #[error("{0}")]
    Transport(String),
}

/// Forwards notification payloads to destination endpoints.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    max_retries: u32,
    attempt_timeout: Duration,
}

impl Forwarder {
    pub fn new(max_retries: u32, attempt_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            max_retries,
            attempt_timeout,
        }
    }

    /// Deliver `payload` to `destination` with at most `max_retries`
    /// attempts, each bounded by the per-attempt timeout.
    ///
    /// Retries are immediate, no backoff. The loop always runs to a
    /// terminal outcome; the inbound caller gets an answer only after
    /// delivery has settled one way or the other.
    pub async fn forward(&self, destination: &str, payload: Bytes) -> DeliveryOutcome {
        for attempt in 1..=self.max_retries {
            info!(
                target = destination,
                attempt = attempt,
                max_retries = self.max_retries,
                "forward_attempt"
            );

            match self.attempt(destination, payload.clone()).await {
                Ok(status) => {
                    if status >= 400 {
                        warn!(
                            target = destination,
                            target_status = status,
                            "forward_target_returned_error"
                        );
                    } else {
                        info!(
                            target = destination,
                            target_status = status,
                            "forward_complete"
                        );
                    }
                    return DeliveryOutcome::Forwarded {
                        target: destination.to_string(),
                        target_status: status,
                    };
                }
                Err(AttemptError::Timeout) => {
                    error!(
                        target = destination,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        "forward_timeout"
                    );
                    if attempt == self.max_retries {
                        return DeliveryOutcome::Failed {
                            reason: "target server timeout after retries".to_string(),
                        };
                    }
                }
                Err(AttemptError::Transport(message)) => {
                    error!(
                        target = destination,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        error = %message,
                        "forward_transport_error"
                    );
                    if attempt == self.max_retries {
                        return DeliveryOutcome::Failed {
                            reason: format!("forward failed: {message}"),
                        };
                    }
                }
            }
        }

        // Only reachable with max_retries == 0.
        DeliveryOutcome::Failed {
            reason: "no forward attempts configured".to_string(),
        }
    }

    /// Send the payload once and classify the result.
    async fn attempt(&self, destination: &str, payload: Bytes) -> Result<u16, AttemptError> {
        let response = self
            .client
            .post(destination)
            .header(CONTENT_TYPE, "application/json")
            .header(FORWARDED_BY_HEADER, FORWARDED_BY_VALUE)
            .body(payload)
            .timeout(self.attempt_timeout)
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().as_u16()),
            Err(e) if e.is_timeout() => Err(AttemptError::Timeout),
            Err(e) => Err(AttemptError::Transport(e.to_string())),
        }
    }
}
