//! Layered domain evaluation.
//!
//! # Evaluation Order
//!
//! 1. Project: denied, then allowed
//! 2. Global: denied, then allowed
//! 3. Extension: denied, then allowed
//! 4. Defaults: allowed
//! 5. No match (`none`)
//!
//! The first layer that mentions a domain decides it. Inside a layer a deny
//! beats an allow, so listing a domain twice in one layer denies it.
//!
//! [`evaluate`] reports which layer matched and never looks at the mode.
//! [`decide`] applies the mode on top: `off` bypasses evaluation and
//! `none` becomes a deny in `strict` and an allow in `permissive`.

use serde::Serialize;
use std::fmt;

use super::mode::FirewallMode;
use super::snapshot::{PolicySnapshot, RuleLayer};

/// Which layer produced a decision.
///
/// The string forms are part of the CLI output and audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedLayer {
    /// Project rules.
    Project,
    /// Global user rules.
    Global,
    /// Extension rules.
    Extension,
    /// Built-in allowed list.
    Defaults,
    /// No layer mentioned the domain.
    None,
    /// The firewall is off.
    Off,
}

impl MatchedLayer {
    /// Stable identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Global => "global",
            Self::Extension => "extension",
            Self::Defaults => "defaults",
            Self::None => "none",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for MatchedLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Whether traffic to the domain is let through.
    pub allowed: bool,
    /// The layer that decided.
    pub layer: MatchedLayer,
}

impl CheckOutcome {
    fn new(allowed: bool, layer: MatchedLayer) -> Self {
        Self { allowed, layer }
    }

    /// Whether a rule matched, as opposed to the mode deciding.
    pub fn is_rule_match(&self) -> bool {
        !matches!(self.layer, MatchedLayer::None | MatchedLayer::Off)
    }
}

/// Find the layer that decides `domain`.
///
/// Pure: the result depends only on the arguments. Returns
/// `(false, none)` when nothing matches regardless of the mode.
pub fn evaluate(domain: &str, snapshot: &PolicySnapshot) -> CheckOutcome {
    let layers: [(&RuleLayer, MatchedLayer); 3] = [
        (snapshot.project(), MatchedLayer::Project),
        (snapshot.global(), MatchedLayer::Global),
        (snapshot.extension(), MatchedLayer::Extension),
    ];

    for (rules, name) in layers {
        if rules.is_denied(domain) {
            return CheckOutcome::new(false, name);
        }
        if rules.is_allowed(domain) {
            return CheckOutcome::new(true, name);
        }
    }

    if snapshot.defaults().iter().any(|d| d == domain) {
        return CheckOutcome::new(true, MatchedLayer::Defaults);
    }

    CheckOutcome::new(false, MatchedLayer::None)
}

/// [`evaluate`] with the snapshot's mode applied.
pub fn decide(domain: &str, snapshot: &PolicySnapshot) -> CheckOutcome {
    let mode = snapshot.mode();
    if mode == FirewallMode::Off {
        return CheckOutcome::new(true, MatchedLayer::Off);
    }

    let outcome = evaluate(domain, snapshot);
    if outcome.layer == MatchedLayer::None {
        return CheckOutcome::new(mode.allows_unmatched(), MatchedLayer::None);
    }
    outcome
}
