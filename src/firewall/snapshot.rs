//! Rule layers and immutable policy snapshots.
//!
//! A [`PolicySnapshot`] holds the four layers the evaluator walks, in
//! precedence order:
//!
//! 1. Project (`./.addt.toml`)
//! 2. Global (`~/.addt/config.toml`)
//! 3. Extension (built-in rules for the extension plus the user's rules for it)
//! 4. Defaults (built-in allowed list, allow-only)
//!
//! Snapshots are never mutated once built. The `with_*` methods consume a
//! snapshot and return a new one, so a snapshot shared behind an `Arc` can be
//! read from any thread without locking.

use serde::{Deserialize, Serialize};

use super::defaults::default_allowed;
use super::domain::{normalize_domain, normalize_list};
use super::error::FirewallError;
use super::evaluator::{self, CheckOutcome};
use super::mode::FirewallMode;

/// One layer's allowed and denied domains.
///
/// Duplicates are tolerated; membership is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleLayer {
    /// Domains this layer allows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,

    /// Domains this layer denies. Deny wins over allow inside a layer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<String>,
}

impl RuleLayer {
    /// Create a layer from raw lists.
    pub fn new(allowed: Vec<String>, denied: Vec<String>) -> Self {
        Self { allowed, denied }
    }

    /// Copy with every entry normalized and malformed entries dropped.
    pub fn normalized(&self) -> Self {
        Self {
            allowed: normalize_list(&self.allowed),
            denied: normalize_list(&self.denied),
        }
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    /// Whether `domain` is in the allowed list.
    pub fn is_allowed(&self, domain: &str) -> bool {
        self.allowed.iter().any(|d| d == domain)
    }

    /// Whether `domain` is in the denied list.
    pub fn is_denied(&self, domain: &str) -> bool {
        self.denied.iter().any(|d| d == domain)
    }

    /// This layer followed by `other`'s entries.
    pub fn appended(&self, other: &RuleLayer) -> Self {
        let mut merged = self.clone();
        merged.allowed.extend(other.allowed.iter().cloned());
        merged.denied.extend(other.denied.iter().cloned());
        merged
    }

    /// The layer after applying `change`.
    ///
    /// - allow: add to allowed, drop from denied
    /// - deny: add to denied, drop from allowed
    /// - remove: drop from both
    /// - reset: clear both
    pub fn with_change(&self, change: &RuleChange) -> Self {
        let mut next = self.clone();
        match change {
            RuleChange::Allow(domain) => {
                next.denied.retain(|d| d != domain);
                if !next.is_allowed(domain) {
                    next.allowed.push(domain.clone());
                }
            }
            RuleChange::Deny(domain) => {
                next.allowed.retain(|d| d != domain);
                if !next.is_denied(domain) {
                    next.denied.push(domain.clone());
                }
            }
            RuleChange::Remove(domain) => {
                next.allowed.retain(|d| d != domain);
                next.denied.retain(|d| d != domain);
            }
            RuleChange::Reset => {
                next.allowed.clear();
                next.denied.clear();
            }
        }
        next
    }
}

/// A single edit to one layer's rules.
///
/// Construct through [`RuleChange::allow`], [`RuleChange::deny`] and
/// [`RuleChange::remove`] so the domain is normalized on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChange {
    /// Allow a domain.
    Allow(String),
    /// Deny a domain.
    Deny(String),
    /// Forget a domain in both lists.
    Remove(String),
    /// Clear the layer.
    Reset,
}

impl RuleChange {
    /// Allow `raw` after normalization.
    pub fn allow(raw: &str) -> Result<Self, FirewallError> {
        normalize_domain(raw).map(Self::Allow)
    }

    /// Deny `raw` after normalization.
    pub fn deny(raw: &str) -> Result<Self, FirewallError> {
        normalize_domain(raw).map(Self::Deny)
    }

    /// Remove `raw` after normalization.
    pub fn remove(raw: &str) -> Result<Self, FirewallError> {
        normalize_domain(raw).map(Self::Remove)
    }

    /// Action name used in audit events.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Allow(_) => "allow",
            Self::Deny(_) => "deny",
            Self::Remove(_) => "remove",
            Self::Reset => "reset",
        }
    }

    /// The domain this change targets, if any.
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::Allow(d) | Self::Deny(d) | Self::Remove(d) => Some(d),
            Self::Reset => None,
        }
    }
}

/// Immutable view of every firewall layer plus the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySnapshot {
    project: RuleLayer,
    global: RuleLayer,
    extension: RuleLayer,
    defaults: Vec<String>,
    mode: FirewallMode,
}

impl PolicySnapshot {
    /// A snapshot with only the Defaults layer populated.
    pub fn new(mode: FirewallMode) -> Self {
        Self {
            project: RuleLayer::default(),
            global: RuleLayer::default(),
            extension: RuleLayer::default(),
            defaults: default_allowed(),
            mode,
        }
    }

    /// Replace the project layer.
    #[must_use]
    pub fn with_project(mut self, rules: &RuleLayer) -> Self {
        self.project = rules.normalized();
        self
    }

    /// Replace the global layer.
    #[must_use]
    pub fn with_global(mut self, rules: &RuleLayer) -> Self {
        self.global = rules.normalized();
        self
    }

    /// Replace the extension layer.
    #[must_use]
    pub fn with_extension(mut self, rules: &RuleLayer) -> Self {
        self.extension = rules.normalized();
        self
    }

    /// Replace the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: FirewallMode) -> Self {
        self.mode = mode;
        self
    }

    /// Project layer.
    pub fn project(&self) -> &RuleLayer {
        &self.project
    }

    /// Global layer.
    pub fn global(&self) -> &RuleLayer {
        &self.global
    }

    /// Extension layer.
    pub fn extension(&self) -> &RuleLayer {
        &self.extension
    }

    /// Defaults layer (allowed only).
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Firewall mode.
    pub fn mode(&self) -> FirewallMode {
        self.mode
    }

    /// Which layer decides `domain`, ignoring the mode.
    pub fn evaluate(&self, domain: &str) -> CheckOutcome {
        evaluator::evaluate(domain, self)
    }

    /// Final verdict for `domain` with the mode applied.
    pub fn decide(&self, domain: &str) -> CheckOutcome {
        evaluator::decide(domain, self)
    }
}

impl Default for PolicySnapshot {
    fn default() -> Self {
        Self::new(FirewallMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(allowed: &[&str], denied: &[&str]) -> RuleLayer {
        RuleLayer::new(
            allowed.iter().map(|d| d.to_string()).collect(),
            denied.iter().map(|d| d.to_string()).collect(),
        )
    }

    #[test]
    fn test_allow_moves_domain_out_of_denied() {
        let rules = layer(&[], &["npm.example.com"]);
        let next = rules.with_change(&RuleChange::allow("npm.example.com").unwrap());

        assert_eq!(next, layer(&["npm.example.com"], &[]));
        // Original untouched
        assert_eq!(rules, layer(&[], &["npm.example.com"]));
    }

    #[test]
    fn test_deny_moves_domain_out_of_allowed() {
        let rules = layer(&["a.com", "b.com"], &[]);
        let next = rules.with_change(&RuleChange::deny("a.com").unwrap());

        assert_eq!(next, layer(&["b.com"], &["a.com"]));
    }

    #[test]
    fn test_allow_does_not_duplicate() {
        let rules = layer(&["a.com"], &[]);
        let next = rules.with_change(&RuleChange::allow("A.com").unwrap());

        assert_eq!(next.allowed, vec!["a.com"]);
    }

    #[test]
    fn test_remove_and_reset() {
        let rules = layer(&["a.com", "b.com"], &["a.com"]);

        let removed = rules.with_change(&RuleChange::remove("a.com").unwrap());
        assert_eq!(removed, layer(&["b.com"], &[]));

        let reset = rules.with_change(&RuleChange::Reset);
        assert!(reset.is_empty());
    }

    #[test]
    fn test_change_constructors_reject_malformed() {
        assert!(matches!(RuleChange::allow(""), Err(FirewallError::MalformedDomain(_))));
        assert!(matches!(RuleChange::deny(" \t"), Err(FirewallError::MalformedDomain(_))));
        assert!(matches!(RuleChange::remove("a b"), Err(FirewallError::MalformedDomain(_))));
    }

    #[test]
    fn test_change_metadata() {
        let change = RuleChange::deny("Evil.com").unwrap();
        assert_eq!(change.action(), "deny");
        assert_eq!(change.domain(), Some("evil.com"));
        assert_eq!(RuleChange::Reset.domain(), None);
    }

    #[test]
    fn test_snapshot_normalizes_layers() {
        let snapshot = PolicySnapshot::default().with_global(&layer(&["GitHub.COM", ""], &[]));

        assert_eq!(snapshot.global().allowed, vec!["github.com"]);
    }

    #[test]
    fn test_with_layer_returns_new_snapshot() {
        let base = PolicySnapshot::default();
        let next = base.clone().with_project(&layer(&["a.com"], &[]));

        assert!(base.project().is_empty());
        assert!(next.project().is_allowed("a.com"));
        assert_eq!(next.defaults(), base.defaults());
    }

    #[test]
    fn test_appended_keeps_order() {
        let merged = layer(&["a.com"], &["x.com"]).appended(&layer(&["b.com"], &["y.com"]));

        assert_eq!(merged, layer(&["a.com", "b.com"], &["x.com", "y.com"]));
    }
}
