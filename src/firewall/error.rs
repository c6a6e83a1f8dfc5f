//! Error types for firewall rule management.
//!
//! Evaluation itself never fails; these errors come from the mutation entry
//! points and from persisting rules.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while validating or persisting firewall rules.
#[derive(Debug, Error)]
pub enum FirewallError {
    /// The rule scope is not recognized.
    #[error("Invalid firewall scope: {0:?} (expected global, project or extension <name>)")]
    InvalidScope(String),

    /// The domain is empty or contains whitespace.
    #[error("Malformed domain: {0:?}")]
    MalformedDomain(String),

    /// Loading or saving the rules failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
