//! Immutable routing table mapping normalized page identifiers to
//! downstream destination URLs.
//!
//! The table is built once at startup from a JSON object in the
//! environment and never mutated afterwards, so it can be shared across
//! request handlers behind an `Arc` without synchronization.

use std::collections::HashMap;

use tracing::{error, info, warn};
use url::Url;

use super::normalize::normalize;

/// Read-only mapping from normalized identifier to destination URL.
#[derive(Debug, Default)]
pub struct RoutingTable {
    entries: HashMap<String, String>,
}

impl RoutingTable {
    /// Build a table from a JSON object of raw identifier -> destination URL.
    ///
    /// Keys are normalized to digits-only form; values are trimmed of
    /// surrounding whitespace. If two raw keys normalize to the same
    /// identifier, the later one in document order wins (a warning names
    /// both raw keys, since this usually signals a configuration mistake).
    ///
    /// Malformed input - unparseable JSON, a non-object top level, or a
    /// non-string value - yields an empty table rather than a startup
    /// failure. The service keeps running with no destinations known,
    /// which is logged at error level.
    pub fn from_json(raw: &str) -> Self {
        let parsed: serde_json::Map<String, serde_json::Value> =
            match serde_json::from_str(raw) {
                Ok(map) => map,
                Err(e) => {
                    error!(error = %e, "route_map_parse_failed");
                    return Self::default();
                }
            };

        let mut pairs = Vec::with_capacity(parsed.len());
        for (key, value) in &parsed {
            match value.as_str() {
                Some(destination) => pairs.push((key.as_str(), destination)),
                None => {
                    error!(key = %key, "route_map_non_string_destination");
                    return Self::default();
                }
            }
        }

        Self::build(pairs)
    }

    /// Build a table from raw (identifier, destination) pairs.
    ///
    /// Pair order is significant: on a normalized-key collision the last
    /// pair wins.
    pub fn build<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries = HashMap::new();
        let mut raw_keys: HashMap<String, String> = HashMap::new();

        for (raw_key, raw_value) in pairs {
            let key = normalize(raw_key);
            let value = raw_value.trim().to_string();

            if key.is_empty() {
                warn!(raw_key = %raw_key, "route_map_key_has_no_digits");
                continue;
            }

            if Url::parse(&value).is_err() {
                warn!(
                    raw_key = %raw_key,
                    destination = %value,
                    "route_map_destination_not_absolute_url"
                );
            }

            if let Some(previous_raw) = raw_keys.insert(key.clone(), raw_key.to_string()) {
                warn!(
                    normalized = %key,
                    previous_raw_key = %previous_raw,
                    raw_key = %raw_key,
                    "route_map_key_collision_last_wins"
                );
            }

            entries.insert(key, value);
        }

        info!(routes = entries.len(), "routing_table_built");

        Self { entries }
    }

    /// Resolve a normalized identifier to its destination URL.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of registered destinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (normalized identifier, destination URL) pairs.
    ///
    /// Used by the admin listing; iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_normalizes_keys_and_trims_values() {
        let table = RoutingTable::build([(" 123-456 ", "  https://a.example/webhook  ")]);
        assert_eq!(table.lookup("123456"), Some("https://a.example/webhook"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_miss() {
        let table = RoutingTable::build([("111", "https://a.example")]);
        assert_eq!(table.lookup("222"), None);
    }

    #[test]
    fn test_empty_key_never_routes() {
        let table = RoutingTable::build([("---", "https://a.example")]);
        assert!(table.is_empty());
        assert_eq!(table.lookup(""), None);
    }

    #[test]
    fn test_collision_last_write_wins() {
        // "12-3" and "123" normalize to the same key; document order
        // decides and the later entry wins. Order-dependent on purpose.
        let table = RoutingTable::build([("12-3", "https://a.example"), ("123", "https://b.example")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("123"), Some("https://b.example"));

        let reversed =
            RoutingTable::build([("123", "https://b.example"), ("12-3", "https://a.example")]);
        assert_eq!(reversed.lookup("123"), Some("https://a.example"));
    }

    #[test]
    fn test_from_json_round_trip() {
        let table = RoutingTable::from_json(
            r#"{"178-414": "https://a.example/webhook", "999": " https://b.example "}"#,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("178414"), Some("https://a.example/webhook"));
        assert_eq!(table.lookup("999"), Some("https://b.example"));
    }

    #[test]
    fn test_from_json_malformed_yields_empty_table() {
        assert!(RoutingTable::from_json("not json").is_empty());
        assert!(RoutingTable::from_json("{\"unterminated\":").is_empty());
    }

    #[test]
    fn test_from_json_non_object_yields_empty_table() {
        assert!(RoutingTable::from_json("[1, 2, 3]").is_empty());
        assert!(RoutingTable::from_json("\"just a string\"").is_empty());
    }

    #[test]
    fn test_from_json_non_string_value_yields_empty_table() {
        assert!(RoutingTable::from_json(r#"{"123": 42}"#).is_empty());
        assert!(RoutingTable::from_json(r#"{"123": {"nested": true}}"#).is_empty());
    }

    #[test]
    fn test_from_json_empty_object() {
        let table = RoutingTable::from_json("{}");
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_iter_exposes_all_routes() {
        let table =
            RoutingTable::build([("111", "https://a.example"), ("222", "https://b.example")]);
        let mut routes: Vec<_> = table.iter().collect();
        routes.sort();
        assert_eq!(
            routes,
            vec![("111", "https://a.example"), ("222", "https://b.example")]
        );
    }

    #[test]
    fn test_invalid_destination_url_is_kept() {
        // Bad destinations are warned about at build time but still
        // stored; they surface as transport errors at forward time.
        let table = RoutingTable::build([("123", "not a url")]);
        assert_eq!(table.lookup("123"), Some("not a url"));
    }
}
