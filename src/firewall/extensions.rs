//! Built-in extension rule sets.
//!
//! Each known extension ships an allowed list for the endpoints its tool
//! needs. The TOML is embedded at compile time. The extension layer of a
//! snapshot is the built-in set followed by the user's
//! `[extensions.<name>.firewall]` rules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::FirewallError;
use super::snapshot::RuleLayer;
use crate::config::ConfigError;

/// Embedded rules for Claude Code.
pub const EXTENSION_CLAUDE: &str = include_str!("../../extensions/claude.toml");

/// Embedded rules for Codex.
pub const EXTENSION_CODEX: &str = include_str!("../../extensions/codex.toml");

/// Embedded rules for Cursor.
pub const EXTENSION_CURSOR: &str = include_str!("../../extensions/cursor.toml");

/// Embedded rules for Gemini CLI.
pub const EXTENSION_GEMINI: &str = include_str!("../../extensions/gemini.toml");

/// A parsed built-in extension definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionRules {
    /// Extension identity.
    pub extension: ExtensionInfo,

    /// Firewall rules the extension contributes.
    #[serde(default)]
    pub firewall: RuleLayer,
}

/// Basic information about an extension.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionInfo {
    /// Internal name (used for lookup).
    pub name: String,

    /// Human-readable display name.
    pub display_name: String,
}

impl ExtensionRules {
    /// Raw embedded TOML for a built-in extension.
    pub fn get_embedded(name: &str) -> Option<&'static str> {
        match name {
            "claude" => Some(EXTENSION_CLAUDE),
            "codex" => Some(EXTENSION_CODEX),
            "cursor" => Some(EXTENSION_CURSOR),
            "gemini" => Some(EXTENSION_GEMINI),
            _ => None,
        }
    }

    /// Parse the built-in rules for `name`.
    pub fn load_builtin(name: &str) -> Result<Option<Self>, ConfigError> {
        let Some(embedded) = Self::get_embedded(name) else {
            return Ok(None);
        };
        toml::from_str(embedded)
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                path: PathBuf::from(format!("<embedded:{name}>")),
                source: e,
            })
    }
}

/// Built-in rules for `name`, empty for unknown extensions.
pub fn builtin_rules(name: &str) -> Result<RuleLayer, FirewallError> {
    Ok(ExtensionRules::load_builtin(name)?
        .map(|rules| rules.firewall)
        .unwrap_or_default())
}

/// Validate an extension name used as a rule scope.
///
/// Names are trimmed and lowercased so `Claude` and `claude` select the same
/// built-in set and the same `[extensions.<name>]` table.
pub fn validate_extension_name(name: &str) -> Result<String, FirewallError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(FirewallError::InvalidScope(format!("extension {name:?}")));
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_extensions_parse() {
        for name in ["claude", "codex", "cursor", "gemini"] {
            let rules = ExtensionRules::load_builtin(name).unwrap().unwrap();
            assert_eq!(rules.extension.name, name);
            assert!(!rules.firewall.allowed.is_empty());
            assert!(rules.firewall.denied.is_empty());
        }
    }

    #[test]
    fn test_codex_allows_openai() {
        let rules = builtin_rules("codex").unwrap();
        assert!(rules.is_allowed("api.openai.com"));
    }

    #[test]
    fn test_unknown_extension_is_empty() {
        assert!(ExtensionRules::get_embedded("windsurf").is_none());
        assert!(builtin_rules("windsurf").unwrap().is_empty());
    }

    #[test]
    fn test_validate_extension_name() {
        assert_eq!(validate_extension_name(" claude ").unwrap(), "claude");
        assert_eq!(validate_extension_name("Claude").unwrap(), "claude");
        assert!(matches!(
            validate_extension_name(""),
            Err(FirewallError::InvalidScope(_))
        ));
        assert!(matches!(
            validate_extension_name("my ext"),
            Err(FirewallError::InvalidScope(_))
        ));
    }
}
