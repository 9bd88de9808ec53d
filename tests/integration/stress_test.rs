//! Concurrent callers against a busy worker

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use iconcache::CacheKey;

use crate::helpers::{counted_cache, ext, CallLog, IDLE_TIMEOUT};

const THREADS: usize = 8;
const ROUNDS: usize = 300;
const MAX_ENTRIES: usize = 16;
const KEY_SPACE: usize = 64;

fn key_for(thread: usize, round: usize, offset: usize) -> CacheKey {
    ext(&format!("k{}", (thread * 31 + round * 7 + offset) % KEY_SPACE))
}

#[test]
fn invariants_hold_under_concurrent_callers() {
    let live = Arc::new(AtomicUsize::new(0));
    let log = CallLog::default();
    let cache = Arc::new(counted_cache(MAX_ENTRIES, &live, &log));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    if round % 3 == 0 {
                        let keys = (0..5).map(|o| key_for(t, round, o)).collect();
                        cache.set_workload(keys);
                    }

                    for offset in 0..5 {
                        let key = key_for(t, round, offset);
                        if let Some(handle) = cache.request_icon(&key) {
                            // Every hit must carry the icon made for that key
                            let icon = handle.resource().expect("resolver never misses here");
                            assert_eq!(icon.key, key);
                        }
                    }

                    let stats = cache.stats();
                    assert!(stats.entries <= MAX_ENTRIES);
                    assert_eq!(stats.entries, stats.queue_len);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("caller thread panicked");
    }

    assert!(cache.wait_idle(IDLE_TIMEOUT));
    let stats = cache.stats();
    assert!(stats.entries <= MAX_ENTRIES);
    assert_eq!(stats.entries, stats.queue_len);
    assert_eq!(stats.faults, 0);

    cache.shutdown();
    drop(cache);
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn a_key_is_resolved_at_most_once_while_resident() {
    let live = Arc::new(AtomicUsize::new(0));
    let log = CallLog::default();
    // Large enough that nothing is ever evicted
    let cache = Arc::new(counted_cache(KEY_SPACE, &live, &log));

    let callers: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..ROUNDS / 10 {
                    let keys = (0..8).map(|o| key_for(t, round, o)).collect();
                    cache.set_workload(keys);
                }
            })
        })
        .collect();
    for caller in callers {
        caller.join().unwrap();
    }

    // Make sure every key has been attempted at least once
    cache.set_workload((0..KEY_SPACE).map(|n| ext(&format!("k{}", n))).collect());
    assert!(cache.wait_idle(IDLE_TIMEOUT));

    for n in 0..KEY_SPACE {
        let key = ext(&format!("k{}", n));
        assert_eq!(log.count(&key), 1, "{} resolved more than once", key);
    }
    assert_eq!(cache.stats().evicted, 0);
}
