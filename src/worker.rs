//! Workload workers
//!
//! Each worker owns a small deterministic RNG and drives uniform random
//! lookups over the corpus against the shared cache, inserting a
//! placeholder on every miss. Tallies accumulate in plain locals and fold
//! into the global counters once per batch, keeping atomic traffic off
//! the per-request path.

use bytes::Bytes;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::cache::ConcurrentCache;
use crate::runner::RunContext;
use crate::stats::WorkerTally;

/// Requests a worker completes between counter flushes
pub const FLUSH_BATCH: usize = 1000;

/// Worker loop: probe, tally, flush, until the stop signal is raised.
///
/// The context's corpus must be non-empty; the harness rejects an empty
/// one before spawning. The worker's RNG is seeded from the run's base
/// seed plus its index, so streams are distinct per worker and
/// reproducible across runs and platforms. The stop check sits at the
/// batch boundary: a worker overshoots a stop request by at most one
/// batch, and the in-progress batch is always flushed before exit, so
/// the global total stays an exact multiple of [`FLUSH_BATCH`].
pub(crate) fn run<C>(ctx: &RunContext<C>, worker_index: usize)
where
    C: ConcurrentCache<Bytes, u64>,
{
    let mut rng = SmallRng::seed_from_u64(ctx.base_seed.wrapping_add(worker_index as u64));
    let mut tally = WorkerTally::default();
    let demand = ctx.corpus.len();

    debug!(worker = worker_index, "worker started");
    while !ctx.stop.is_raised() {
        for i in 0..FLUSH_BATCH {
            let key = ctx.corpus.key(rng.gen_range(0..demand));
            if ctx.cache.lookup(key).is_some() {
                tally.record_hit();
            } else {
                ctx.cache.insert(key.clone(), i as u64);
                tally.record_miss();
            }
        }
        ctx.counters.flush(&tally);
        tally.reset();
    }
    debug!(worker = worker_index, "worker stopped");
}

// =============================================================================
// Tests
// =============================================================================
