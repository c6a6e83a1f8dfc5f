//! addt: run AI coding assistants in isolated containers
//!
//! This crate provides the policy core of the addt CLI, which wraps tools
//! such as Claude Code, Codex and Cursor in containers with an outbound
//! firewall and optional OpenTelemetry export.
//!
//! # Architecture
//!
//! - **Firewall**: layered allow/deny evaluation over project, global,
//!   extension and built-in rules, plus a store that persists rule edits
//! - **Config**: TOML config files with three-state settings and
//!   environment overrides
//! - **Telemetry**: resolution of OTEL settings into the container
//!   environment, and a syslog audit trail
//!
//! Container providers, image builds and extension scripts live outside
//! this crate.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod cli_handler;
pub mod config;
pub mod firewall;
pub mod telemetry;
