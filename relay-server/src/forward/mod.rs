//! Forwarding module: delivery outcomes and the bounded-retry forwarder.
//!
//! ## Flow
//!
//! ```text
//! dispatch → Forwarder::forward → at most MAX_RETRIES attempts → DeliveryOutcome
//! ```

pub mod forwarder;
pub mod types;

pub use forwarder::{Forwarder, FORWARDED_BY_HEADER, FORWARDED_BY_VALUE};
pub use types::DeliveryOutcome;
