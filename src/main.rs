//! addt: run AI coding assistants in isolated containers.
//!
//! This is the main entry point for the addt binary. It handles CLI argument
//! parsing, logging setup and dispatch to the command handlers.
//!
//! # I/O
//!
//! - **Command output** goes to stdout (`firewall list`, `otel env`, ...)
//! - **Debug logging** goes to stderr via `tracing`, filtered by `-v`
//! - **Audit logging** goes to syslog; inside a container without a syslog
//!   daemon audit events are dropped

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, warn};

use addt::{cli::Cli, cli_handler, telemetry};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;
    debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = telemetry::init_logger() {
        warn!("Audit logging disabled: {}", e);
        telemetry::init_null_logger().context("Failed to initialize audit logger")?;
    }

    cli_handler::handle_command(cli)
}

/// Initialize the tracing subscriber for debug/development logging.
///
/// # Verbosity Levels
/// - 0 (default): `RUST_LOG` if set, otherwise warnings and errors
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
