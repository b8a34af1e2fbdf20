//! Shared run statistics
//!
//! Two increment-only global counters (hits, total requests) fed by
//! per-worker batch tallies, plus the stop flag workers poll between
//! batches. Counters are atomic adds, monotonic under concurrent
//! writers, with no ordering between different workers' flushes; a
//! release/acquire pair on the hits counter keeps every observation at
//! `hits <= total`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Per-worker local tally, folded into [`SharedCounters`] once per batch
///
/// Plain integers on the worker's stack; batching keeps atomic traffic to
/// two adds per 1000 requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTally {
    /// Lookups that found the key present
    pub hits: u64,
    /// All lookups, hit or miss
    pub total: u64,
}

impl WorkerTally {
    /// Record a lookup that hit.
    #[inline]
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.total += 1;
    }

    /// Record a lookup that missed.
    #[inline]
    pub fn record_miss(&mut self) {
        self.total += 1;
    }

    /// Clear both counts after a flush.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Global hit/total counters shared by all workers
///
/// Increment-only for the lifetime of a run; never reset. Invariant:
/// `hits <= total` at every observation.
#[derive(Debug, Default)]
pub struct SharedCounters {
    hits: AtomicU64,
    total: AtomicU64,
}

impl SharedCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a worker's local tally into the global counters.
    ///
    /// `total` is added first and the `hits` add is a release paired
    /// with the acquire load in [`Self::snapshot`]: a snapshot that
    /// includes a flush's hits also includes its total, so
    /// `hits <= total` holds at every observation.
    #[inline]
    pub fn flush(&self, tally: &WorkerTally) {
        self.total.fetch_add(tally.total, Ordering::Relaxed);
        self.hits.fetch_add(tally.hits, Ordering::Release);
    }

    /// Consistent-enough point-in-time copy of both counters.
    ///
    /// The two loads are not a single atomic unit: flushes landing
    /// between them appear only in `total`, so a snapshot can observe a
    /// hit count behind its total count but never ahead of it. Both
    /// values are monotonic across successive snapshots.
    pub fn snapshot(&self) -> CountersSnapshot {
        let hits = self.hits.load(Ordering::Acquire);
        let total = self.total.load(Ordering::Relaxed);
        CountersSnapshot { hits, total }
    }
}

/// Plain copy of the global counters at one observation instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    /// Cumulative hits
    pub hits: u64,
    /// Cumulative requests
    pub total: u64,
}

impl CountersSnapshot {
    /// Hit ratio as a percentage; `0.0` when no requests completed.
    pub fn hit_ratio_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64 * 100.0
        }
    }

    /// Counts accumulated since an earlier snapshot of the same run.
    pub fn delta_since(&self, earlier: &CountersSnapshot) -> CountersSnapshot {
        CountersSnapshot {
            hits: self.hits.saturating_sub(earlier.hits),
            total: self.total.saturating_sub(earlier.total),
        }
    }
}

/// Cooperative stop flag, raised once per run by the orchestrator
///
/// Single writer, many readers. Workers poll it at batch boundaries, so
/// raising it stops the run within one batch plus one in-flight cache
/// operation per worker.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: AtomicBool,
}

impl StopSignal {
    /// Create a signal in the running (not raised) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Idempotent.
    pub fn raise(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// True once the signal has been raised.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Tests
// =============================================================================
