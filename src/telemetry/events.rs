//! Audit event types for structured logging.
//!
//! These events are logged to syslog with the `ADDT_FIREWALL` tag so that
//! firewall decisions and rule edits leave an audit trail.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::firewall::{FirewallMode, MatchedLayer};

/// Audit events for security logging.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A domain was checked against the firewall.
    FirewallCheck {
        /// Normalized domain.
        domain: String,
        /// Final verdict.
        allowed: bool,
        /// Layer that decided.
        layer: MatchedLayer,
        /// Mode in effect.
        mode: FirewallMode,
    },

    /// A rule was added or removed.
    RuleChange {
        /// Scope that was edited (`global`, `project`, `extension:<name>`).
        scope: String,
        /// `allow`, `deny` or `remove`.
        action: String,
        /// Domain the rule applies to.
        domain: String,
    },

    /// A scope's rules were cleared.
    RuleReset {
        /// Scope that was reset.
        scope: String,
    },
}

/// Wrapper for serializing events with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent<'a> {
    /// ISO8601 timestamp.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// The actual event (flattened into this struct).
    #[serde(flatten)]
    pub event: &'a AuditEvent,
}

impl AuditEvent {
    /// Wrap this event with a timestamp for serialization.
    pub fn with_timestamp(&self) -> TimestampedEvent<'_> {
        TimestampedEvent {
            timestamp: Utc::now(),
            event: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firewall_check_serialization() {
        let event = AuditEvent::FirewallCheck {
            domain: "registry.npmjs.org".to_string(),
            allowed: false,
            layer: MatchedLayer::Global,
            mode: FirewallMode::Strict,
        };

        let json = serde_json::to_string(&event.with_timestamp()).unwrap();

        assert!(json.contains("\"event\":\"firewall_check\""));
        assert!(json.contains("\"domain\":\"registry.npmjs.org\""));
        assert!(json.contains("\"allowed\":false"));
        assert!(json.contains("\"layer\":\"global\""));
        assert!(json.contains("\"mode\":\"strict\""));
        assert!(json.contains("\"ts\""));
    }

    #[test]
    fn test_rule_change_serialization() {
        let event = AuditEvent::RuleChange {
            scope: "extension:codex".to_string(),
            action: "deny".to_string(),
            domain: "chatgpt.com".to_string(),
        };

        let json = serde_json::to_string(&event.with_timestamp()).unwrap();

        assert!(json.contains("\"event\":\"rule_change\""));
        assert!(json.contains("\"scope\":\"extension:codex\""));
        assert!(json.contains("\"action\":\"deny\""));
    }

    #[test]
    fn test_rule_reset_serialization() {
        let event = AuditEvent::RuleReset {
            scope: "project".to_string(),
        };

        let json = serde_json::to_string(&event.with_timestamp()).unwrap();

        assert!(json.contains("\"event\":\"rule_reset\""));
        assert!(json.contains("\"scope\":\"project\""));
    }
}
