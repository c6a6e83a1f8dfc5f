//! Configuration system for addt.
//!
//! This module provides TOML configuration loading, three-state settings and
//! environment overrides.
//!
//! # Configuration Hierarchy
//!
//! Settings are resolved in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. Global config: `~/.addt/config.toml`
//! 3. Project config: `./.addt.toml`
//! 4. Environment variables (`ADDT_OTEL_*`, `ADDT_FIREWALL_MODE`)
//!
//! # Merge Behavior
//!
//! - **Scalars** are [`SettingValue`] cells: the last *present* value wins,
//!   so an explicit `false` in the project file beats `true` in the global one
//! - **Firewall lists** are never merged: each file is its own layer
//!
//! ```toml
//! [firewall]
//! mode = "strict"
//! allowed = ["example.com"]
//!
//! [otel]
//! enabled = true
//!
//! [extensions.claude.firewall]
//! denied = ["sentry.io"]
//! ```

pub mod env;
mod error;
mod loader;
mod schema;
mod setting;

pub use error::ConfigError;
pub use loader::{
    ConfigLayers, ConfigLoader, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, PROJECT_CONFIG_FILE,
};
pub use schema::{ExtensionSection, FileConfig, FirewallSection, OtelSettings};
pub use setting::SettingValue;
