//! Environment variable overrides.
//!
//! Environment variables sit above both config files. A variable that is
//! unset or empty leaves the resolved value alone. Booleans accept only the
//! literal strings `true` and `false`; anything else is ignored.
//!
//! Lookups go through a closure so the override logic stays a pure function
//! of its inputs. [`apply_process_env`] wires it to the real environment.

use tracing::warn;

use crate::firewall::FirewallMode;
use crate::telemetry::OtelConfig;

/// Overrides `OtelConfig::enabled`.
pub const ENV_OTEL_ENABLED: &str = "ADDT_OTEL_ENABLED";

/// Overrides `OtelConfig::endpoint`.
pub const ENV_OTEL_ENDPOINT: &str = "ADDT_OTEL_ENDPOINT";

/// Overrides `OtelConfig::protocol`.
pub const ENV_OTEL_PROTOCOL: &str = "ADDT_OTEL_PROTOCOL";

/// Overrides `OtelConfig::service_name`.
pub const ENV_OTEL_SERVICE_NAME: &str = "ADDT_OTEL_SERVICE_NAME";

/// Overrides `OtelConfig::headers`.
pub const ENV_OTEL_HEADERS: &str = "ADDT_OTEL_HEADERS";

/// Overrides the configured firewall mode.
pub const ENV_FIREWALL_MODE: &str = "ADDT_FIREWALL_MODE";

/// Every variable this module reads.
pub const RECOGNIZED_VARS: &[&str] = &[
    ENV_OTEL_ENABLED,
    ENV_OTEL_ENDPOINT,
    ENV_OTEL_PROTOCOL,
    ENV_OTEL_SERVICE_NAME,
    ENV_OTEL_HEADERS,
    ENV_FIREWALL_MODE,
];

/// Overlay recognized environment variables onto a resolved telemetry config.
pub fn apply_env<F>(mut config: OtelConfig, lookup: F) -> OtelConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(raw) = get(ENV_OTEL_ENABLED) {
        match parse_bool(&raw) {
            Some(enabled) => config.enabled = enabled,
            None => warn!("Ignoring {}={:?}: expected true or false", ENV_OTEL_ENABLED, raw),
        }
    }
    if let Some(endpoint) = get(ENV_OTEL_ENDPOINT) {
        config.endpoint = endpoint;
    }
    if let Some(protocol) = get(ENV_OTEL_PROTOCOL) {
        config.protocol = protocol;
    }
    if let Some(service_name) = get(ENV_OTEL_SERVICE_NAME) {
        config.service_name = service_name;
    }
    if let Some(headers) = get(ENV_OTEL_HEADERS) {
        config.headers = headers;
    }

    config
}

/// [`apply_env`] against the process environment.
pub fn apply_process_env(config: OtelConfig) -> OtelConfig {
    apply_env(config, |name| std::env::var(name).ok())
}

/// Firewall mode from the environment, if set to a recognized value.
pub fn firewall_mode_override<F>(lookup: F) -> Option<FirewallMode>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(ENV_FIREWALL_MODE).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(_) => {
            warn!(
                "Ignoring {}={:?}: expected strict, permissive or off",
                ENV_FIREWALL_MODE, raw
            );
            None
        }
    }
}

/// [`firewall_mode_override`] against the process environment.
pub fn process_firewall_mode_override() -> Option<FirewallMode> {
    firewall_mode_override(|name| std::env::var(name).ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn apply(pairs: &[(&str, &str)]) -> OtelConfig {
        let vars = env(pairs);
        apply_env(OtelConfig::default(), |name| vars.get(name).cloned())
    }

    #[test]
    fn test_no_vars_leaves_config_unchanged() {
        assert_eq!(apply(&[]), OtelConfig::default());
    }

    #[test]
    fn test_string_overrides() {
        let config = apply(&[
            (ENV_OTEL_ENDPOINT, "http://collector:4317"),
            (ENV_OTEL_PROTOCOL, "grpc"),
            (ENV_OTEL_SERVICE_NAME, "custom"),
            (ENV_OTEL_HEADERS, "x-token=abc"),
        ]);

        assert_eq!(config.endpoint, "http://collector:4317");
        assert_eq!(config.protocol, "grpc");
        assert_eq!(config.service_name, "custom");
        assert_eq!(config.headers, "x-token=abc");
    }

    #[test]
    fn test_bool_parsing() {
        assert!(apply(&[(ENV_OTEL_ENABLED, "true")]).enabled);

        let enabled = OtelConfig {
            enabled: true,
            ..Default::default()
        };
        let vars = env(&[(ENV_OTEL_ENABLED, "false")]);
        assert!(!apply_env(enabled, |name| vars.get(name).cloned()).enabled);
    }

    #[test]
    fn test_unknown_bool_leaves_field_unchanged() {
        assert!(!apply(&[(ENV_OTEL_ENABLED, "yes")]).enabled);
        assert!(!apply(&[(ENV_OTEL_ENABLED, "TRUE")]).enabled);
        assert!(!apply(&[(ENV_OTEL_ENABLED, "1")]).enabled);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = apply(&[(ENV_OTEL_ENDPOINT, ""), (ENV_OTEL_SERVICE_NAME, "")]);

        assert_eq!(config.endpoint, OtelConfig::default().endpoint);
        assert_eq!(config.service_name, OtelConfig::default().service_name);
    }

    #[test]
    fn test_unrecognized_vars_are_ignored() {
        assert_eq!(apply(&[("ADDT_OTEL_UNKNOWN", "x")]), OtelConfig::default());
    }

    #[test]
    fn test_firewall_mode_override() {
        let vars = env(&[(ENV_FIREWALL_MODE, "permissive")]);
        assert_eq!(
            firewall_mode_override(|name| vars.get(name).cloned()),
            Some(FirewallMode::Permissive)
        );

        let vars = env(&[(ENV_FIREWALL_MODE, "loose")]);
        assert_eq!(firewall_mode_override(|name| vars.get(name).cloned()), None);

        assert_eq!(firewall_mode_override(|_| None), None);
    }
}
