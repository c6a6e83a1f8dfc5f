//! Configuration schema definitions.
//!
//! The global file (`~/.addt/config.toml`) and the project file
//! (`./.addt.toml`) share one schema. Every scalar is a [`SettingValue`] so
//! that a key missing from the project file defers to the global file, while
//! a key set to `false` or `""` overrides it.
//!
//! Rule lists are not merged across files: each file is its own firewall
//! layer and the evaluator walks the layers separately.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::setting::SettingValue;
use crate::firewall::{FirewallMode, RuleLayer};

/// Contents of one configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileConfig {
    /// Firewall mode and the rules for this file's layer.
    #[serde(default)]
    pub firewall: FirewallSection,

    /// Telemetry settings.
    #[serde(default)]
    pub otel: OtelSettings,

    /// Per-extension settings, keyed by extension name.
    ///
    /// Only read from the global file.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, ExtensionSection>,
}

impl FileConfig {
    /// User rules for an extension, empty when the extension has no section.
    pub fn extension_rules(&self, name: &str) -> RuleLayer {
        self.extensions
            .get(name)
            .map(|ext| ext.firewall.clone())
            .unwrap_or_default()
    }

    /// Replace the user rules for an extension.
    ///
    /// An extension whose rules become empty is dropped from the file.
    pub fn set_extension_rules(&mut self, name: &str, rules: RuleLayer) {
        if rules.is_empty() {
            self.extensions.remove(name);
        } else {
            self.extensions
                .entry(name.to_string())
                .or_default()
                .firewall = rules;
        }
    }
}

/// `[firewall]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FirewallSection {
    /// How an unmatched domain is treated.
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub mode: SettingValue<FirewallMode>,

    /// Domains this layer allows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,

    /// Domains this layer denies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<String>,
}

impl FirewallSection {
    /// The rule lists of this section as a layer.
    pub fn rules(&self) -> RuleLayer {
        RuleLayer::new(self.allowed.clone(), self.denied.clone())
    }

    /// Replace the rule lists, leaving the mode untouched.
    pub fn set_rules(&mut self, rules: RuleLayer) {
        self.allowed = rules.allowed;
        self.denied = rules.denied;
    }
}

/// `[extensions.<name>]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExtensionSection {
    /// User firewall rules for this extension.
    #[serde(default)]
    pub firewall: RuleLayer,
}

/// `[otel]` section: telemetry settings as written by one layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OtelSettings {
    /// Whether telemetry is exported.
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub enabled: SettingValue<bool>,

    /// OTLP collector endpoint.
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub endpoint: SettingValue<String>,

    /// OTLP protocol (`http/json`, `http/protobuf`, `grpc`).
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub protocol: SettingValue<String>,

    /// Service name reported to the collector.
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub service_name: SettingValue<String>,

    /// Raw OTLP headers string (`key=value,key=value`).
    #[serde(default, skip_serializing_if = "SettingValue::is_absent")]
    pub headers: SettingValue<String>,
}

impl OtelSettings {
    /// Merge a higher-precedence layer into this one.
    ///
    /// Present cells in `other` win; absent cells leave `self` untouched.
    pub fn merge(&mut self, other: OtelSettings) {
        self.enabled.merge(other.enabled);
        self.endpoint.merge(other.endpoint);
        self.protocol.merge(other.protocol);
        self.service_name.merge(other.service_name);
        self.headers.merge(other.headers);
    }
}
