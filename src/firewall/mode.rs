//! Firewall mode.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the firewall treats a domain that no layer mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FirewallMode {
    /// Unmatched domains are denied.
    #[default]
    Strict,
    /// Unmatched domains are allowed.
    Permissive,
    /// The firewall is bypassed; every domain is allowed.
    Off,
}

impl FirewallMode {
    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
            Self::Off => "off",
        }
    }

    /// Whether a domain matched by no rule is let through.
    pub fn allows_unmatched(self) -> bool {
        !matches!(self, Self::Strict)
    }
}

impl fmt::Display for FirewallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FirewallMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            "off" => Ok(Self::Off),
            other => Err(format!("unknown firewall mode: {other}")),
        }
    }
}
