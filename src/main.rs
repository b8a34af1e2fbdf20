//! cachebench binary
//!
//! Parses the command line, initializes logging, and hands the run to the
//! library's orchestrator. Help and version requests exit 0; usage and
//! validation failures exit 1 before any worker starts; a completed
//! duration-bound run exits 0; live mode runs until externally
//! terminated.

use std::process;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cachebench::cli::{self, Args};
use cachebench::config::BenchConfig;
use cachebench::runner;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(cli::exit_code(&err));
        }
    };

    init_logging();

    let config = BenchConfig::from(args);
    if let Err(err) = runner::execute(&config) {
        error!("benchmark failed: {}", err);
        process::exit(1);
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

/// Diagnostics go to stderr through the fmt subscriber, filtered by
/// `RUST_LOG` with an `info` default; stdout stays reserved for
/// measurement output.
fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
