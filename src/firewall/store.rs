//! Rule store: loads snapshots from config and persists rule edits.
//!
//! The store hands out `Arc<PolicySnapshot>`s. An edit writes the affected
//! config file, builds a fresh snapshot and swaps it in; anyone still holding
//! the previous `Arc` keeps seeing the old rules until they ask again.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::error::FirewallError;
use super::extensions::{builtin_rules, validate_extension_name};
use super::mode::FirewallMode;
use super::snapshot::{PolicySnapshot, RuleChange, RuleLayer};
use crate::config::{ConfigLayers, ConfigLoader};

/// Which editable layer a rule edit targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `~/.addt/config.toml` `[firewall]`.
    Global,
    /// `./.addt.toml` `[firewall]`.
    Project,
    /// `~/.addt/config.toml` `[extensions.<name>.firewall]`.
    Extension(String),
}

impl Scope {
    /// Extension scope with a validated name.
    pub fn extension(name: &str) -> Result<Self, FirewallError> {
        validate_extension_name(name).map(Self::Extension)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Project => f.write_str("project"),
            Self::Extension(name) => write!(f, "extension:{name}"),
        }
    }
}

/// Result of [`RuleStore::apply`].
#[derive(Debug, Clone)]
pub struct ChangeOutcome {
    /// Whether the scope's rules differ from before.
    pub changed: bool,
    /// The scope's user rules after the edit.
    pub rules: RuleLayer,
    /// Snapshot reflecting the edit.
    pub snapshot: Arc<PolicySnapshot>,
}

/// Owns the config loader and the current policy snapshot.
#[derive(Debug)]
pub struct RuleStore {
    loader: ConfigLoader,
    extension: Option<String>,
    snapshot: Arc<PolicySnapshot>,
}

impl RuleStore {
    /// Load every layer from disk.
    ///
    /// `extension` selects which extension's rules populate the extension
    /// layer; with `None` that layer is empty.
    pub fn open(loader: ConfigLoader, extension: Option<&str>) -> Result<Self, FirewallError> {
        let extension = extension.map(validate_extension_name).transpose()?;
        let layers = loader.load()?;
        let snapshot = build_snapshot(&layers, extension.as_deref())?;

        debug!(
            "Loaded firewall snapshot (mode={}, extension={:?})",
            snapshot.mode(),
            extension
        );

        Ok(Self {
            loader,
            extension,
            snapshot: Arc::new(snapshot),
        })
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Extension whose rules are loaded, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Swap in a snapshot with a different mode.
    ///
    /// Used for `--mode` and `ADDT_FIREWALL_MODE`; nothing is persisted.
    pub fn override_mode(&mut self, mode: FirewallMode) -> Arc<PolicySnapshot> {
        self.snapshot = Arc::new((*self.snapshot).clone().with_mode(mode));
        self.snapshot()
    }

    /// The user-editable rules for `scope`, read from disk.
    ///
    /// Built-in extension rules are not included.
    pub fn user_rules(&self, scope: &Scope) -> Result<RuleLayer, FirewallError> {
        let rules = match scope {
            Scope::Global => self.loader.load_global()?.firewall.rules(),
            Scope::Project => self.loader.load_project()?.firewall.rules(),
            Scope::Extension(name) => self.loader.load_global()?.extension_rules(name),
        };
        Ok(rules.normalized())
    }

    /// Apply `change` to `scope`, persist it and refresh the snapshot.
    pub fn apply(
        &mut self,
        scope: &Scope,
        change: &RuleChange,
    ) -> Result<ChangeOutcome, FirewallError> {
        let before = self.user_rules(scope)?;
        let after = before.with_change(change);

        match scope {
            Scope::Global => {
                self.loader
                    .update_global(|cfg| cfg.firewall.set_rules(after.clone()))?;
            }
            Scope::Project => {
                self.loader
                    .update_project(|cfg| cfg.firewall.set_rules(after.clone()))?;
            }
            Scope::Extension(name) => {
                self.loader
                    .update_global(|cfg| cfg.set_extension_rules(name, after.clone()))?;
            }
        }

        let current = (*self.snapshot).clone();
        let next = match scope {
            Scope::Global => current.with_global(&after),
            Scope::Project => current.with_project(&after),
            Scope::Extension(name) if self.extension.as_deref() == Some(name.as_str()) => {
                current.with_extension(&builtin_rules(name)?.appended(&after))
            }
            Scope::Extension(_) => current,
        };
        self.snapshot = Arc::new(next);

        let changed = before != after;
        info!(
            "Firewall {} {} {} (changed={})",
            scope,
            change.action(),
            change.domain().unwrap_or("*"),
            changed
        );

        Ok(ChangeOutcome {
            changed,
            rules: after,
            snapshot: self.snapshot(),
        })
    }
}

/// Assemble a snapshot from both config files and the built-in rules.
pub fn build_snapshot(
    layers: &ConfigLayers,
    extension: Option<&str>,
) -> Result<PolicySnapshot, FirewallError> {
    let mut snapshot = PolicySnapshot::new(layers.firewall_mode())
        .with_global(&layers.global.firewall.rules())
        .with_project(&layers.project.firewall.rules());

    if let Some(name) = extension {
        let rules = builtin_rules(name)?.appended(&layers.global.extension_rules(name));
        snapshot = snapshot.with_extension(&rules);
    }

    Ok(snapshot)
}
