//! Command-line interface definitions for addt.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::firewall::FirewallMode;

/// Default container provider reported in resource attributes.
pub const DEFAULT_PROVIDER: &str = "podman";

/// Run AI coding assistants in isolated containers.
///
/// addt wraps tools such as Claude Code, Codex and Cursor in a container
/// with an outbound firewall and optional OpenTelemetry export.
#[derive(Parser, Debug)]
#[command(name = "addt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the global config file (default: ~/.addt/config.toml).
    #[arg(long = "global-config", value_name = "PATH", global = true)]
    pub global_config: Option<PathBuf>,

    /// Path to the project config file (default: ./.addt.toml).
    #[arg(long = "project-config", value_name = "PATH", global = true)]
    pub project_config: Option<PathBuf>,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage and query the outbound network firewall.
    Firewall {
        /// Firewall subcommand.
        #[command(subcommand)]
        command: FirewallCommand,
    },

    /// Inspect the OpenTelemetry settings passed to containers.
    Otel {
        /// Telemetry subcommand.
        #[command(subcommand)]
        command: OtelCommand,
    },
}

/// `addt firewall ...`
#[derive(Subcommand, Debug)]
pub enum FirewallCommand {
    /// Rules in the global config.
    Global {
        /// Rule action.
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Rules in the project config.
    Project {
        /// Rule action.
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Rules for one extension.
    #[command(subcommand_precedence_over_arg = true)]
    Extension {
        /// Extension name (claude, codex, cursor, ...).
        name: String,

        /// Rule action.
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Check whether a domain is allowed.
    ///
    /// Exits 0 when allowed and 1 when denied.
    Check {
        /// Domain to check.
        domain: String,

        /// Include this extension's rules.
        #[arg(short = 'e', long = "extension", value_name = "NAME")]
        extension: Option<String>,

        /// Override the configured firewall mode.
        #[arg(long = "mode", value_enum)]
        mode: Option<FirewallMode>,
    },

    /// Print the built-in allowed domains.
    Defaults,
}

/// Action on one rule scope.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Allow a domain.
    Allow {
        /// Domain to allow.
        domain: String,
    },

    /// Deny a domain.
    Deny {
        /// Domain to deny.
        domain: String,
    },

    /// Remove a domain from both lists.
    Remove {
        /// Domain to remove.
        domain: String,
    },

    /// Print the scope's rules.
    List,

    /// Clear the scope's rules.
    Reset,
}

/// `addt otel ...`
#[derive(Subcommand, Debug)]
pub enum OtelCommand {
    /// Print the resolved telemetry settings.
    Show {
        /// Extension the service name is specialized for.
        #[arg(short = 'e', long = "extension", value_name = "NAME")]
        extension: Option<String>,
    },

    /// Print the environment variables handed to the container.
    Env {
        /// Extension (tool) name.
        #[arg(short = 'e', long = "extension", value_name = "NAME")]
        extension: Option<String>,

        /// Container provider.
        #[arg(long = "provider", value_name = "NAME", default_value = DEFAULT_PROVIDER)]
        provider: String,

        /// Project name (default: working directory name).
        #[arg(long = "project", value_name = "NAME")]
        project: Option<String>,
    },
}
