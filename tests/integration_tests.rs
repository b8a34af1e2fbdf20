//! cachebench Integration Tests
//!
//! End-to-end coverage of the harness behavior:
//! - Counter conservation and batch-granular flushing
//! - Hit-ratio bounds for fitting and thrashing corpus/capacity pairs
//! - Duration-mode timing and summary output shape
//! - Configuration and CLI rejection paths

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;

use cachebench::cache::ConcurrentCache;
use cachebench::runner::{run_for_duration, Harness};
use cachebench::worker::FLUSH_BATCH;
use cachebench::{BenchConfig, CacheKind, Corpus, LruCache, ShardedCache};

/// Spin until the run has accumulated at least `min_total` requests.
fn wait_for_total<C>(harness: &Harness<C>, min_total: u64)
where
    C: ConcurrentCache<Bytes, u64> + 'static,
{
    let deadline = Instant::now() + Duration::from_secs(30);
    while harness.snapshot().total < min_total {
        assert!(
            Instant::now() < deadline,
            "run did not reach {} requests in time",
            min_total
        );
        thread::sleep(Duration::from_millis(1));
    }
}

// =============================================================================
// Harness End-to-End Tests
// =============================================================================

mod harness_tests {
    use super::*;

    #[test]
    fn test_counters_conserved_in_whole_batches() {
        let harness =
            Harness::launch(LruCache::new(1000), Corpus::generate(4000), 4, 1).unwrap();

        wait_for_total(&harness, 20 * FLUSH_BATCH as u64);
        let last = harness.stop_and_join();

        // Flushes happen only at batch completion, so the drained total
        // is an exact multiple of the batch size across all workers.
        assert_eq!(last.total % FLUSH_BATCH as u64, 0);
        assert!(last.total >= 20 * FLUSH_BATCH as u64);
        assert!(last.hits <= last.total);
    }

    #[test]
    fn test_counters_monotonic_while_running() {
        let harness =
            Harness::launch(LruCache::new(500), Corpus::generate(2000), 2, 2).unwrap();

        let mut prev = harness.snapshot();
        for _ in 0..50 {
            thread::sleep(Duration::from_millis(2));
            let cur = harness.snapshot();
            assert!(cur.total >= prev.total);
            assert!(cur.hits >= prev.hits);
            assert!(cur.hits <= cur.total);
            prev = cur;
        }
        harness.stop_and_join();
    }

    #[test]
    fn test_fitting_corpus_ratio_approaches_full() {
        // Capacity covers the corpus: every key misses at most once.
        let harness =
            Harness::launch(LruCache::new(2000), Corpus::generate(1000), 2, 3).unwrap();

        wait_for_total(&harness, 50 * FLUSH_BATCH as u64);
        let last = harness.stop_and_join();

        assert!(last.total - last.hits <= 1000);
        assert!(last.hit_ratio_percent() > 95.0);
    }

    #[test]
    fn test_thrashing_cache_ratio_near_zero() {
        // A single slot under a 1000-key corpus: a hit needs the same key
        // twice in a row, so the ratio stays close to zero.
        let harness =
            Harness::launch(LruCache::new(1), Corpus::generate(1000), 2, 4).unwrap();

        wait_for_total(&harness, 20 * FLUSH_BATCH as u64);
        let last = harness.stop_and_join();

        assert!(last.hit_ratio_percent() < 5.0);
    }

    #[test]
    fn test_sharded_cache_end_to_end() {
        let harness =
            Harness::launch(ShardedCache::new(1024), Corpus::generate(4096), 4, 5).unwrap();

        wait_for_total(&harness, 10 * FLUSH_BATCH as u64);
        let cache_len = harness.context().cache.len();
        let capacity = harness.context().cache.capacity();
        let last = harness.stop_and_join();

        assert!(cache_len <= capacity);
        assert!(last.hits <= last.total);
        assert!(last.total > 0);
        // Cold start with capacity below the corpus: misses are certain.
        assert!(last.hit_ratio_percent() < 100.0);
        assert!(last.hit_ratio_percent() >= 0.0);
    }

    #[test]
    fn test_multi_worker_miss_bound() {
        // Four workers with distinct seeds over a corpus that fits: no
        // matter how their streams interleave, only first touches miss.
        let harness =
            Harness::launch(LruCache::new(4096), Corpus::generate(4096), 4, 6).unwrap();

        wait_for_total(&harness, 8 * FLUSH_BATCH as u64);
        let last = harness.stop_and_join();
        assert!(last.total - last.hits <= 4096);
    }
}

// =============================================================================
// Duration Mode Tests
// =============================================================================

mod duration_tests {
    use super::*;

    #[test]
    fn test_duration_mode_elapsed_and_summary() {
        let config = BenchConfig {
            cache: CacheKind::Lru,
            threads: 2,
            cache_size: 512,
            demand_size: 1024,
            duration_secs: 1,
            base_seed: 7,
        };
        let harness = Harness::launch(
            LruCache::new(config.cache_size),
            Corpus::generate(config.demand_size),
            config.threads,
            config.base_seed,
        )
        .unwrap();

        let summary = run_for_duration(harness, &config);

        assert!(summary.elapsed_secs >= 1.0);
        assert!(summary.elapsed_secs < 2.0);
        assert!(summary.counters.total > 0);
        assert!(summary.rate_kreq_per_sec() > 0.0);

        let row = summary.row();
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "lru");
        assert_eq!(fields[1], "2");
        assert_eq!(fields[2], "512");
        assert_eq!(fields[3], "1024");
        assert!(fields[6].ends_with('%'));
    }

    #[test]
    fn test_summary_ratio_bounded_for_fitting_corpus() {
        let config = BenchConfig {
            cache: CacheKind::Scalable,
            threads: 1,
            cache_size: 4096,
            demand_size: 1024,
            duration_secs: 1,
            base_seed: 8,
        };
        let harness = Harness::launch(
            ShardedCache::new(config.cache_size),
            Corpus::generate(config.demand_size),
            config.threads,
            config.base_seed,
        )
        .unwrap();

        let summary = run_for_duration(harness, &config);

        // 4096 entries over 64 shards leaves 64 per shard; the 1024-key
        // corpus spreads far below that, so misses stay near first-touch
        // counts and the ratio lands high.
        assert!(summary.hit_ratio_percent() > 90.0);
        assert!(summary.hit_ratio_percent() <= 100.0);
        assert_eq!(summary.row().split('\t').count(), 7);
    }
}

// =============================================================================
// Configuration and CLI Rejection Tests
// =============================================================================

mod rejection_tests {
    use super::*;
    use assert_matches::assert_matches;
    use cachebench::cli::Args;
    use cachebench::{runner, Error};
    use clap::Parser;

    #[test]
    fn test_execute_rejects_degenerate_configs() {
        for (threads, cache_size, demand_size) in [(0, 10, 10), (1, 0, 10), (1, 10, 0)] {
            let config = BenchConfig {
                cache: CacheKind::Lru,
                threads,
                cache_size,
                demand_size,
                duration_secs: 1,
                base_seed: 0,
            };
            assert_matches!(
                runner::execute(&config),
                Err(Error::InvalidArgument { .. })
            );
        }
    }

    #[test]
    fn test_malformed_invocations_rejected() {
        // Too few arguments, unknown cache type, numeric parse failures.
        assert!(Args::try_parse_from(["cachebench"]).is_err());
        assert!(Args::try_parse_from(["cachebench", "lru", "4"]).is_err());
        assert!(Args::try_parse_from(["cachebench", "fifo", "4", "10", "10"]).is_err());
        assert!(Args::try_parse_from(["cachebench", "lru", "abc", "10", "10"]).is_err());
        assert!(Args::try_parse_from(["cachebench", "lru", "4", "10", "10", "x"]).is_err());
    }
}

// =============================================================================
// Cache Contract Tests
// =============================================================================

mod contract_tests {
    use super::*;

    fn warm_and_read<C>(cache: C)
    where
        C: ConcurrentCache<Bytes, u64> + 'static,
    {
        let corpus = Corpus::generate(256);
        for (i, key) in corpus.iter().enumerate() {
            cache.insert(key.clone(), i as u64);
        }

        let cache = Arc::new(cache);
        let corpus = Arc::new(corpus);
        let mut handles = vec![];
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let corpus = Arc::clone(&corpus);
            handles.push(thread::spawn(move || {
                for (i, key) in corpus.iter().enumerate() {
                    assert_eq!(cache.lookup(key), Some(i as u64));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_lru_concurrent_warm_reads_all_hit() {
        warm_and_read(LruCache::new(256));
    }

    #[test]
    fn test_sharded_concurrent_warm_reads_all_hit() {
        // Sized well past the corpus so no shard can overflow even under
        // an uneven hash spread.
        warm_and_read(ShardedCache::new(4096));
    }
}
