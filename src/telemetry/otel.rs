//! OpenTelemetry settings for the wrapped tool.
//!
//! addt does not export telemetry itself. It resolves the user's settings
//! and hands the container a set of standard `OTEL_*` variables so the tool
//! inside exports to the configured collector.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::OtelSettings;

/// Default OTLP endpoint (the host's collector, seen from a container).
pub const DEFAULT_ENDPOINT: &str = "http://host.docker.internal:4318";

/// Default OTLP protocol.
pub const DEFAULT_PROTOCOL: &str = "http/json";

/// Default service name. Only this exact value gets the extension suffix.
pub const DEFAULT_SERVICE_NAME: &str = "addt";

/// Protocols the OTLP exporters accept.
pub const SUPPORTED_PROTOCOLS: &[&str] = &["http/json", "http/protobuf", "grpc"];

/// Fully resolved telemetry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtelConfig {
    /// Whether telemetry is exported.
    pub enabled: bool,
    /// OTLP collector endpoint.
    pub endpoint: String,
    /// OTLP protocol.
    pub protocol: String,
    /// Service name.
    pub service_name: String,
    /// Raw OTLP headers, empty for none.
    pub headers: String,
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            headers: String::new(),
        }
    }
}

impl OtelConfig {
    /// Resolve `layers` (increasing precedence) over `defaults`.
    ///
    /// For each field the last layer with a present value wins; fields no
    /// layer sets keep the default.
    pub fn resolve<'a, I>(defaults: OtelConfig, layers: I) -> OtelConfig
    where
        I: IntoIterator<Item = &'a OtelSettings>,
    {
        let mut merged = OtelSettings::default();
        for layer in layers {
            merged.merge(layer.clone());
        }

        let mut config = defaults;
        merged.enabled.apply_to(&mut config.enabled);
        merged.endpoint.apply_to(&mut config.endpoint);
        merged.protocol.apply_to(&mut config.protocol);
        merged.service_name.apply_to(&mut config.service_name);
        merged.headers.apply_to(&mut config.headers);
        config
    }

    /// Whether the protocol is one the exporters understand.
    pub fn protocol_is_supported(&self) -> bool {
        SUPPORTED_PROTOCOLS.contains(&self.protocol.as_str())
    }

    /// Service name as reported for `extension`.
    ///
    /// An unmodified default becomes `addt-<extension>`; a customized name
    /// is kept verbatim.
    pub fn service_name_for(&self, extension: &str) -> String {
        if self.service_name == DEFAULT_SERVICE_NAME && !extension.is_empty() {
            format!("{}-{}", DEFAULT_SERVICE_NAME, extension)
        } else {
            self.service_name.clone()
        }
    }
}

/// Metadata attached to every telemetry payload from a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAttrs {
    /// Extension (tool) name, e.g. `claude`.
    pub extension: String,
    /// Container provider, e.g. `podman`.
    pub provider: String,
    /// addt version.
    pub version: String,
    /// Project name.
    pub project: String,
}

impl ResourceAttrs {
    /// `OTEL_RESOURCE_ATTRIBUTES` value, or `None` when every field is empty.
    ///
    /// Order is fixed: extension, provider, version, project.
    pub fn encode(&self) -> Option<String> {
        let pairs: Vec<String> = [
            ("extension", &self.extension),
            ("provider", &self.provider),
            ("version", &self.version),
            ("project", &self.project),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("addt.{key}={value}"))
        .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join(","))
        }
    }
}

/// Environment variables that configure the tool's OTLP exporters.
///
/// Empty when telemetry is disabled.
pub fn compose_env(config: &OtelConfig, attrs: &ResourceAttrs) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    if !config.enabled {
        return env;
    }

    let mut set = |key: &str, value: String| {
        env.insert(key.to_string(), value);
    };

    set("OTEL_EXPORTER_OTLP_ENDPOINT", config.endpoint.clone());
    set("OTEL_EXPORTER_OTLP_PROTOCOL", config.protocol.clone());
    set("OTEL_SERVICE_NAME", config.service_name_for(&attrs.extension));
    if !config.headers.is_empty() {
        set("OTEL_EXPORTER_OTLP_HEADERS", config.headers.clone());
    }
    if let Some(resource) = attrs.encode() {
        set("OTEL_RESOURCE_ATTRIBUTES", resource);
    }
    set("OTEL_METRICS_EXPORTER", "otlp".to_string());
    set("OTEL_LOGS_EXPORTER", "otlp".to_string());
    set("CLAUDE_CODE_ENABLE_TELEMETRY", "1".to_string());

    env
}
