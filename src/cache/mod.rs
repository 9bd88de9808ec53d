//! Bounded icon cache with background resolution
//!
//! `IconCache` answers lookups from the caller's thread without ever
//! blocking on resolution. Callers collect the keys they missed and hand
//! them over with `set_workload`; a single worker thread resolves them and
//! fills the store, so a later lookup hits.
//!
//! ```no_run
//! use std::sync::Arc;
//! use iconcache::cache::{CacheOptions, IconCache};
//! use iconcache::icon::{CacheKey, IconImage, ThemeResolver};
//!
//! let resolver = Arc::new(ThemeResolver::new("hicolor", 16, Vec::new()));
//! let cache: IconCache<IconImage> = IconCache::new(resolver, CacheOptions::default())?;
//!
//! let key = CacheKey::extension("txt");
//! if cache.request_icon(&key).is_none() {
//!     cache.set_workload(vec![key]);
//! }
//! # Ok::<(), iconcache::cache::CacheError>(())
//! ```

pub mod error;
pub mod store;
pub mod worker;

pub use error::CacheError;
pub use store::{BoundedStore, StoreSnapshot, DEFAULT_MAX_ENTRIES};
pub use worker::{Workload, DEFAULT_WAIT_TIMEOUT};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::icon::{CacheKey, IconHandle, IconResolver, IconResource};
use worker::{resolve_guarded, spawn_worker, WorkerContext, WorkerCounters};

/// Construction parameters for an `IconCache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum number of resident icons
    pub max_entries: usize,
    /// Longest the idle worker sleeps between stop-flag checks
    pub wait_timeout: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub queue_len: usize,
    pub max_entries: usize,
    pub pending: usize,
    pub found: u64,
    pub misses: u64,
    pub faults: u64,
    pub skipped: u64,
    pub evicted: u64,
    pub resident_bytes: usize,
}

/// Icon cache shared between render code and its background worker.
///
/// Construct one at application start and share it by reference or `Arc`.
/// Dropping it (or calling [`IconCache::shutdown`]) stops and joins the
/// worker.
pub struct IconCache<I: IconResource> {
    store: Arc<BoundedStore<I>>,
    workload: Arc<Workload>,
    counters: Arc<WorkerCounters>,
    resolver: Arc<dyn IconResolver<I>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutting_down: AtomicBool,
    directory_icon: OnceLock<IconHandle<I>>,
    file_icon: OnceLock<IconHandle<I>>,
}

impl<I: IconResource> IconCache<I> {
    /// Create the cache and start its worker.
    ///
    /// Returns once the worker thread is running.
    pub fn new(
        resolver: Arc<dyn IconResolver<I>>,
        options: CacheOptions,
    ) -> Result<Self, CacheError> {
        let store = Arc::new(BoundedStore::new(options.max_entries));
        let workload = Arc::new(Workload::new());
        let counters = Arc::new(WorkerCounters::default());

        let handle = spawn_worker(WorkerContext {
            workload: Arc::clone(&workload),
            store: Arc::clone(&store),
            resolver: Arc::clone(&resolver),
            counters: Arc::clone(&counters),
            wait_timeout: options.wait_timeout,
        })?;

        debug!(max_entries = store.max_entries(), "icon cache started");

        Ok(Self {
            store,
            workload,
            counters,
            resolver,
            worker: Mutex::new(Some(handle)),
            shutting_down: AtomicBool::new(false),
            directory_icon: OnceLock::new(),
            file_icon: OnceLock::new(),
        })
    }

    /// Create the cache from any resolver value, closures included.
    pub fn with_resolver<R>(resolver: R, options: CacheOptions) -> Result<Self, CacheError>
    where
        R: IconResolver<I> + 'static,
    {
        Self::new(Arc::new(resolver), options)
    }

    fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Look up a cached icon without blocking or triggering resolution.
    ///
    /// `None` means "not resolved yet" (or the cache is shutting down).
    /// `Some` with an empty handle means resolution found nothing.
    pub fn request_icon(&self, key: &CacheKey) -> Option<IconHandle<I>> {
        if self.is_shutting_down() {
            return None;
        }
        self.store.try_get(key)
    }

    /// Replace the pending workload with `keys` and wake the worker.
    ///
    /// Keys at the end of the list are resolved first. Keys left over from
    /// the previous call are discarded.
    pub fn set_workload(&self, keys: Vec<CacheKey>) {
        if self.is_shutting_down() {
            return;
        }
        let count = keys.len();
        let discarded = self.workload.replace(keys);
        debug!(count, discarded, "icon workload submitted");
    }

    /// Generic folder icon, resolved once on first use.
    pub fn directory_icon(&self) -> IconHandle<I> {
        self.fallback_icon(&self.directory_icon, CacheKey::Directory)
    }

    /// Generic file icon, resolved once on first use.
    pub fn file_icon(&self) -> IconHandle<I> {
        self.fallback_icon(&self.file_icon, CacheKey::GenericFile)
    }

    fn fallback_icon(&self, cell: &OnceLock<IconHandle<I>>, key: CacheKey) -> IconHandle<I> {
        if let Some(handle) = cell.get() {
            return handle.clone();
        }
        if self.is_shutting_down() {
            return IconHandle::empty();
        }
        cell.get_or_init(|| resolve_guarded(self.resolver.as_ref(), &key).0)
            .clone()
    }

    /// Block until the worker has drained the workload, or `timeout` passes.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.workload.wait_idle(timeout)
    }

    /// Number of cached icons.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.store.max_entries()
    }

    pub fn stats(&self) -> CacheStats {
        let snapshot = self.store.snapshot();
        CacheStats {
            entries: snapshot.entries,
            queue_len: snapshot.queue_len,
            max_entries: self.store.max_entries(),
            pending: self.workload.pending(),
            found: self.counters.found.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            faults: self.counters.faults.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            evicted: snapshot.evicted,
            resident_bytes: snapshot.resident_bytes,
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Any resolution in progress finishes first. Later lookups return
    /// `None` and later workloads are ignored. Safe to call more than once.
    pub fn shutdown(&self) {
        if !self.shutting_down.swap(true, Ordering::SeqCst) {
            self.workload.replace(Vec::new());
            self.workload.request_stop();
        }

        // Joining under the lock makes concurrent callers wait for the join
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                error!("icon worker panicked");
            }
            debug!("icon cache shut down");
        }
    }
}

impl<I: IconResource> Drop for IconCache<I> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
