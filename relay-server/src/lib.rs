//! Webhook relay library.
//!
//! Receives platform notification callbacks on a single public endpoint,
//! resolves the owning downstream service from an immutable routing
//! table, and forwards the payload verbatim with bounded retry.
//!
//! ## Architecture
//!
//! ```text
//! POST /webhook → dispatch → normalize id → RoutingTable → Forwarder → destination
//! GET  /webhook → subscription verification (independent, stateless path)
//! ```

pub mod config;
pub mod dispatch;
pub mod forward;
pub mod routing;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::dispatch;
pub use forward::{DeliveryOutcome, Forwarder, FORWARDED_BY_HEADER, FORWARDED_BY_VALUE};
pub use routing::{normalize, RoutingTable};
pub use web::AppState;
