//! cachebench - Concurrent Cache Benchmark Harness
//!
//! Drives many worker threads against one shared cache instance with a
//! uniform random access pattern over a fixed key corpus, and reports
//! achieved throughput and hit ratio. Built to compare competing
//! thread-safe cache implementations (a single-lock LRU versus a
//! hash-sharded variant) under identical load.
//!
//! # Architecture
//!
//! ```text
//! Corpus ──▶ Workers (N threads) ──▶ Global Counters ──▶ Reporter ──▶ stdout
//!                    │
//!                    ▼
//!            Cache under test
//!             (lru | scalable)
//! ```
//!
//! Workers draw keys at random, count hits, insert placeholders on miss,
//! and fold local tallies into the global counters once per 1000-request
//! batch. The reporter either prints interval deltas once per second
//! (live mode) or stops the run after a fixed duration and prints one
//! tab-separated summary row.
//!
//! # Modules
//!
//! - [`cache`] - Cache contract and the two implementations under test
//! - [`cli`] - Command-line surface
//! - [`config`] - Run configuration and validation
//! - [`corpus`] - Deterministic key corpus
//! - [`error`] - Error types
//! - [`runner`] - Run lifecycle and reporting
//! - [`stats`] - Shared counters and stop signal
//! - [`worker`] - Workload loop

pub mod cache;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod runner;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use cache::{CacheKind, ConcurrentCache, LruCache, ShardedCache};
pub use config::BenchConfig;
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use runner::{Harness, RunContext, RunSummary};
pub use stats::{CountersSnapshot, SharedCounters, StopSignal, WorkerTally};
