//! Command-line surface
//!
//! Positional arguments in the traditional order:
//!
//! ```text
//! cachebench <lru|scalable> <threads> <cache-size> <demand-size> [<duration>]
//! ```
//!
//! `duration` defaults to 0, which selects live-reporting mode.

use clap::error::ErrorKind;
use clap::Parser;

use crate::cache::CacheKind;
use crate::config::{BenchConfig, DEFAULT_BASE_SEED};

/// Concurrent benchmark harness for thread-safe cache implementations
#[derive(Parser, Debug)]
#[command(name = "cachebench", version, about, long_about = None)]
pub struct Args {
    /// Cache implementation to drive
    #[arg(value_enum, value_name = "lru|scalable")]
    pub cache: CacheKind,

    /// Number of worker threads
    #[arg(value_name = "threads")]
    pub threads: usize,

    /// Cache capacity in entries
    #[arg(value_name = "cache-size")]
    pub cache_size: usize,

    /// Number of distinct keys in the corpus
    #[arg(value_name = "demand-size")]
    pub demand_size: usize,

    /// Run duration in seconds; 0 reports live once per second
    #[arg(value_name = "duration", default_value_t = 0)]
    pub duration: u64,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            cache: args.cache,
            threads: args.threads,
            cache_size: args.cache_size,
            demand_size: args.demand_size,
            duration_secs: args.duration,
            base_seed: DEFAULT_BASE_SEED,
        }
    }
}

/// Process exit code for a parse failure.
///
/// Help and version requests surface as parse errors too and exit 0;
/// every genuine usage or parse error exits 1.
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

// =============================================================================
// Tests
// =============================================================================
