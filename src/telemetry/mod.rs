//! Telemetry: OTEL wiring for containers and the audit log.
//!
//! Two unrelated concerns live here:
//!
//! - **OTEL** ([`otel`]): resolves the user's telemetry settings and composes
//!   the `OTEL_*` environment handed to the container. Pure functions, no I/O.
//! - **Audit** ([`syslog`]): firewall checks and rule edits are written to
//!   syslog as JSON, never to stdout/stderr. Developer logs go through
//!   `tracing` to stderr and are configured in `main`.
//!
//! # Event Format
//!
//! ```json
//! {"ts":"2026-01-07T14:32:01Z","event":"firewall_check","domain":"pypi.org","allowed":true,"layer":"defaults","mode":"strict"}
//! ```

mod error;
mod events;
pub mod otel;
mod syslog;

pub use error::TelemetryError;
pub use events::{AuditEvent, TimestampedEvent};
pub use otel::{OtelConfig, ResourceAttrs, compose_env};
pub use self::syslog::{AuditLogger, SYSLOG_TAG, audit, init_logger, init_null_logger};
