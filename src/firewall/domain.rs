//! Domain normalization.
//!
//! Domains are compared by exact, case-sensitive equality, so everything that
//! enters the firewall (CLI arguments, config file entries) is trimmed and
//! lowercased first.

use tracing::warn;

use super::error::FirewallError;

/// Normalize a domain for storage or lookup.
///
/// Rejects empty strings and strings with interior whitespace.
pub fn normalize_domain(raw: &str) -> Result<String, FirewallError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(FirewallError::MalformedDomain(raw.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Normalize a list read from a config file.
///
/// Malformed entries are dropped with a warning; they never reach the
/// evaluator.
pub fn normalize_list(raw: &[String]) -> Vec<String> {
    raw.iter()
        .filter_map(|entry| match normalize_domain(entry) {
            Ok(domain) => Some(domain),
            Err(_) => {
                warn!("Ignoring malformed firewall entry {:?}", entry);
                None
            }
        })
        .collect()
}
