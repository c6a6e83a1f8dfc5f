//! Syslog integration for audit logging.
//!
//! Audit events are logged to syslog with the `ADDT_FIREWALL` tag. Inside a
//! container there is usually no syslog daemon; the binary then installs a
//! null logger and carries on.

use std::sync::{Mutex, OnceLock};

use syslog::{Facility, Formatter3164};
use tracing::{debug, error};

use super::error::TelemetryError;
use super::events::AuditEvent;

/// Syslog tag for all audit events.
pub const SYSLOG_TAG: &str = "ADDT_FIREWALL";

/// Global audit logger instance.
static AUDIT_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

type SyslogWriter = syslog::Logger<syslog::LoggerBackend, Formatter3164>;

/// Audit logger that writes structured JSON events to syslog.
pub struct AuditLogger {
    /// None indicates a null logger.
    writer: Option<Mutex<SyslogWriter>>,
}

impl AuditLogger {
    /// Create a new audit logger connected to the local syslog socket.
    pub fn new() -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: SYSLOG_TAG.to_string(),
            pid: std::process::id(),
        };

        let writer = syslog::unix(formatter)
            .map_err(|e| TelemetryError::SyslogConnection(e.to_string()))?;

        debug!("Connected to syslog with tag '{}'", SYSLOG_TAG);
        Ok(Self {
            writer: Some(Mutex::new(writer)),
        })
    }

    /// Create a null audit logger that discards all events.
    pub fn new_null() -> Self {
        Self { writer: None }
    }

    /// Serialize an event as a single timestamped JSON line.
    pub fn format(event: &AuditEvent) -> Result<String, TelemetryError> {
        Ok(serde_json::to_string(&event.with_timestamp())?)
    }

    /// Log an audit event to syslog.
    ///
    /// Failures are reported through `tracing` and otherwise ignored; audit
    /// logging never aborts a command.
    pub fn log(&self, event: AuditEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let json = match Self::format(&event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize audit event: {}", e);
                return;
            }
        };

        match writer.lock() {
            Ok(mut writer) => {
                if let Err(e) = writer.info(&json) {
                    error!("Failed to write to syslog: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to acquire syslog writer lock: {}", e);
            }
        }
        debug!("Logged audit event: {}", json);
    }

    /// Check if this is a null logger.
    pub fn is_null(&self) -> bool {
        self.writer.is_none()
    }
}

/// Initialize the global audit logger against syslog.
pub fn init_logger() -> Result<(), TelemetryError> {
    let logger = AuditLogger::new()?;

    AUDIT_LOGGER
        .set(logger)
        .map_err(|_| TelemetryError::AlreadyInitialized)
}

/// Initialize the global audit logger as a null logger.
pub fn init_null_logger() -> Result<(), TelemetryError> {
    AUDIT_LOGGER
        .set(AuditLogger::new_null())
        .map_err(|_| TelemetryError::AlreadyInitialized)
}

/// The global audit logger.
///
/// Falls back to a null logger if neither init function was called.
pub fn audit() -> &'static AuditLogger {
    AUDIT_LOGGER.get_or_init(AuditLogger::new_null)
}
