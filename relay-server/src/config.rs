//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup and held in an immutable
//! `Config` passed into the handlers via shared state; nothing reads the
//! environment after boot.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for the platform's subscription verification handshake
    pub verify_token: String,

    /// Shared secret for the admin routing-table listing
    pub admin_token: String,

    /// Raw JSON object mapping page identifiers to destination URLs
    pub route_map_json: String,

    /// Per-attempt forward timeout in seconds
    pub forward_timeout_secs: u64,

    /// Maximum number of forward attempts per notification
    pub max_retries: u32,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            verify_token: env::var("VERIFY_TOKEN")
                .unwrap_or_else(|_| "change_me_verify_token".to_string()),

            admin_token: env::var("ADMIN_TOKEN")
                .unwrap_or_else(|_| "change_me_in_production".to_string()),

            route_map_json: env::var("ROUTE_MAP").unwrap_or_else(|_| "{}".to_string()),

            forward_timeout_secs: env::var("FORWARD_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        }
    }
}
