//! Run orchestration and reporting
//!
//! Owns the benchmark lifecycle: build the corpus, construct the selected
//! cache, spawn workers over a shared run context, then either report
//! interval deltas once per second forever (live mode) or sleep for the
//! configured duration, stop the workers, and print one summary row.
//!
//! Measurement output goes to stdout; lifecycle diagnostics go to the
//! tracing subscriber.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, error, info};

use crate::cache::{CacheKind, ConcurrentCache, LruCache, ShardedCache};
use crate::config::BenchConfig;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::stats::{CountersSnapshot, SharedCounters, StopSignal};
use crate::worker;

/// Interval between live-mode report lines
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Shared state for one benchmark run
///
/// Constructed once by the orchestrator and handed to every worker behind
/// an `Arc`. All run state lives here; the harness keeps no process-wide
/// globals, so multiple runs can coexist in one process (as the tests
/// do).
pub struct RunContext<C> {
    /// Fixed key universe, shared read-only
    pub corpus: Corpus,
    /// Cache instance under test
    pub cache: C,
    /// Global hit/total counters
    pub counters: SharedCounters,
    /// Cooperative stop flag
    pub stop: StopSignal,
    /// Base seed for per-worker random sources
    pub base_seed: u64,
}

impl<C> RunContext<C>
where
    C: ConcurrentCache<Bytes, u64>,
{
    /// Create a context with zeroed counters and an unraised stop signal.
    pub fn new(corpus: Corpus, cache: C, base_seed: u64) -> Self {
        Self {
            corpus,
            cache,
            counters: SharedCounters::new(),
            stop: StopSignal::new(),
            base_seed,
        }
    }
}

/// A launched benchmark run: shared context plus worker join handles
pub struct Harness<C> {
    ctx: Arc<RunContext<C>>,
    workers: Vec<JoinHandle<()>>,
    started_at: Instant,
}

impl<C> Harness<C>
where
    C: ConcurrentCache<Bytes, u64> + 'static,
{
    /// Spawn `threads` workers over a fresh run context.
    ///
    /// The corpus must be non-empty: workers draw keys uniformly over
    /// it, so an empty corpus is rejected here rather than left to fail
    /// inside a spawned thread. The elapsed-time baseline is captured
    /// once all spawn calls have returned; the gap to each worker's
    /// first request is accepted as benchmarking noise.
    pub fn launch(cache: C, corpus: Corpus, threads: usize, base_seed: u64) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::InvalidArgument {
                name: "corpus",
                reason: "must not be empty",
            });
        }
        let ctx = Arc::new(RunContext::new(corpus, cache, base_seed));
        let mut workers = Vec::with_capacity(threads);
        for index in 0..threads {
            let worker_ctx = Arc::clone(&ctx);
            let spawned = thread::Builder::new()
                .name(format!("worker-{}", index))
                .spawn(move || worker::run(&worker_ctx, index));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // Wind down anything already running before bailing.
                    ctx.stop.raise();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(err.into());
                }
            }
        }
        debug!(threads, "workers spawned");
        Ok(Self {
            ctx,
            workers,
            started_at: Instant::now(),
        })
    }

    /// Elapsed wall time since launch.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Point-in-time copy of the global counters.
    pub fn snapshot(&self) -> CountersSnapshot {
        self.ctx.counters.snapshot()
    }

    /// The shared run context.
    pub fn context(&self) -> &RunContext<C> {
        &self.ctx
    }

    /// Raise the stop signal, join every worker, and return the final
    /// counters (read after all joins, so every flush is included).
    pub fn stop_and_join(self) -> CountersSnapshot {
        self.ctx.stop.raise();
        for handle in self.workers {
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
        self.ctx.counters.snapshot()
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// Outcome of a duration-bounded run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Cache implementation that was driven
    pub cache: CacheKind,
    /// Worker thread count
    pub threads: usize,
    /// Requested cache capacity
    pub cache_size: usize,
    /// Corpus size
    pub demand_size: usize,
    /// Measured wall time in seconds
    pub elapsed_secs: f64,
    /// Counters at the duration boundary
    pub counters: CountersSnapshot,
}

impl RunSummary {
    /// Whole-run throughput in kreq/s; `0.0` for a zero-length run.
    pub fn rate_kreq_per_sec(&self) -> f64 {
        if self.elapsed_secs == 0.0 {
            0.0
        } else {
            self.counters.total as f64 / 1000.0 / self.elapsed_secs
        }
    }

    /// Whole-run hit ratio percent; `0.0` when nothing completed.
    pub fn hit_ratio_percent(&self) -> f64 {
        self.counters.hit_ratio_percent()
    }

    /// Summary table header.
    pub fn header() -> &'static str {
        "type\tthreads\tcache\tdemand\tduration\trate\tratio"
    }

    /// One tab-separated data row matching [`RunSummary::header`].
    pub fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}%",
            self.cache,
            self.threads,
            self.cache_size,
            self.demand_size,
            self.elapsed_secs,
            self.rate_kreq_per_sec(),
            self.hit_ratio_percent()
        )
    }
}

/// One live-mode report line from an interval's worth of counts.
///
/// The interval is the report cadence (one second), so `delta.total /
/// 1000` is directly kreq/s. An idle interval reports a `0.00%` ratio.
fn interval_line(delta: &CountersSnapshot) -> String {
    format!(
        "rate = {:.2} kreq/s, hit ratio = {:.2}%",
        delta.total as f64 / 1000.0,
        delta.hit_ratio_percent()
    )
}

/// Live reporting loop: print the interval rate and hit ratio once per
/// second, indefinitely. Termination is external (process signal).
pub fn run_live<C>(harness: &Harness<C>) -> !
where
    C: ConcurrentCache<Bytes, u64> + 'static,
{
    let mut prev = harness.snapshot();
    loop {
        thread::sleep(REPORT_INTERVAL);
        let cur = harness.snapshot();
        println!("{}", interval_line(&cur.delta_since(&prev)));
        prev = cur;
    }
}

/// Duration-bounded run: sleep for the configured duration, snapshot the
/// counters and elapsed time, then stop and join the workers.
///
/// The snapshot is taken before the stop signal is raised; requests
/// completed between the duration boundary and worker exit are
/// deliberately left out of the summary.
pub fn run_for_duration<C>(harness: Harness<C>, config: &BenchConfig) -> RunSummary
where
    C: ConcurrentCache<Bytes, u64> + 'static,
{
    thread::sleep(Duration::from_secs(config.duration_secs));
    let counters = harness.snapshot();
    let elapsed_secs = harness.elapsed().as_secs_f64();
    let final_counters = harness.stop_and_join();
    info!(
        total = counters.total,
        hits = counters.hits,
        drained_total = final_counters.total,
        "run complete"
    );
    RunSummary {
        cache: config.cache,
        threads: config.threads,
        cache_size: config.cache_size,
        demand_size: config.demand_size,
        elapsed_secs,
        counters,
    }
}

/// Run a configured benchmark to completion.
///
/// Validates the configuration, builds the corpus and the selected cache,
/// and enters the configured mode. Live mode never returns; duration mode
/// prints the summary and returns.
pub fn execute(config: &BenchConfig) -> Result<()> {
    config.validate()?;
    info!(
        cache = %config.cache,
        threads = config.threads,
        cache_size = config.cache_size,
        demand_size = config.demand_size,
        duration_secs = config.duration_secs,
        "starting benchmark"
    );

    let corpus = Corpus::generate(config.demand_size);
    match config.cache {
        CacheKind::Lru => run_with(LruCache::new(config.cache_size), corpus, config),
        CacheKind::Scalable => run_with(ShardedCache::new(config.cache_size), corpus, config),
    }
}

fn run_with<C>(cache: C, corpus: Corpus, config: &BenchConfig) -> Result<()>
where
    C: ConcurrentCache<Bytes, u64> + 'static,
{
    let harness = Harness::launch(cache, corpus, config.threads, config.base_seed)?;
    if config.is_duration_mode() {
        let summary = run_for_duration(harness, config);
        println!("{}", RunSummary::header());
        println!("{}", summary.row());
        Ok(())
    } else {
        run_live(&harness)
    }
}

// =============================================================================
// Tests
// =============================================================================
