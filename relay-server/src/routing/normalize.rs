//! Identifier normalization.
//!
//! Page identifiers arrive decorated in unpredictable ways: surrounding
//! whitespace, punctuation, invisible locale artifacts pasted in from
//! dashboards. Normalization strips everything that is not an ASCII digit
//! so that configuration keys and webhook identifiers always compare equal.
//!
//! The same function MUST be applied to configuration keys at table build
//! time and to webhook identifiers at lookup time. If the two sides ever
//! diverge, lookups fail silently.

/// Reduce a raw identifier to its canonical digits-only form.
///
/// Keeps ASCII decimal digits in their original order and drops every
/// other character. Total function: never fails, empty input yields an
/// empty string (which is never a valid routing key).
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
