//! Background worker that resolves the pending workload
//!
//! A single thread drains a replaceable list of keys from its end, so the
//! keys a caller appended last are resolved first. Every outcome, including
//! "nothing found" and resolver failures, is written to the store so a key
//! is attempted at most once.
//!
//! The worker only sleeps while the workload is empty, on a condition
//! variable with a bounded timeout. The worker checks the stop flag there
//! and nowhere else, so shutdown never interrupts a resolution. The
//! constructor is released once the worker first reaches that wait.

use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, trace, warn};

use super::error::CacheError;
use super::store::BoundedStore;
use crate::icon::{CacheKey, IconHandle, IconResolver, IconResource};

/// How long the idle worker sleeps before re-checking the stop flag.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Name given to the worker thread.
pub const WORKER_THREAD_NAME: &str = "iconcache-worker";

#[derive(Default)]
struct WorkState {
    /// Pending keys; the worker pops from the back
    keys: Vec<CacheKey>,
    /// A key has been taken and its result is not yet stored
    in_flight: bool,
    /// Number of times the workload has been replaced
    generation: u64,
}

/// Pending keys shared between the callers and the worker.
#[derive(Default)]
pub struct Workload {
    state: Mutex<WorkState>,
    /// Signalled when new work arrives or stop is requested
    wake: Condvar,
    /// Signalled when the worker runs out of work
    idle: Condvar,
    stop: AtomicBool,
}

impl Workload {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WorkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Discard the remaining keys and install `keys` as the new workload.
    ///
    /// Returns how many superseded keys were dropped unresolved. Once stop
    /// has been requested the new keys are dropped as well.
    pub fn replace(&self, keys: Vec<CacheKey>) -> usize {
        let (discarded, generation) = {
            let mut state = self.lock();
            if self.is_stopped() {
                let dropped = state.keys.len() + keys.len();
                state.keys.clear();
                return dropped;
            }
            let discarded = mem::replace(&mut state.keys, keys).len();
            state.generation += 1;
            (discarded, state.generation)
        };
        trace!(generation, discarded, "workload replaced");
        self.wake.notify_one();
        discarded
    }

    /// Ask the worker to exit at its next wait and drop the pending keys.
    pub fn request_stop(&self) {
        let mut state = self.lock();
        // Set under the lock so a concurrent `replace` either lands before
        // the clear or sees the flag
        self.stop.store(true, Ordering::SeqCst);
        state.keys.clear();
        self.wake.notify_all();
        self.idle.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Keys not yet taken by the worker.
    pub fn pending(&self) -> usize {
        self.lock().keys.len()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Block until the workload is drained and no key is in flight.
    ///
    /// Returns `false` if `timeout` elapsed first. Returns `true` right away
    /// once the worker has been stopped.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if self.is_stopped() || (state.keys.is_empty() && !state.in_flight) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .idle
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Take the next key, sleeping while there is none.
    ///
    /// Marks the previous key as finished. Returns `None` once stop has been
    /// requested. `ready` is signalled (and cleared) right before the first
    /// sleep.
    fn next_key(
        &self,
        wait_timeout: Duration,
        ready: &mut Option<SyncSender<()>>,
    ) -> Option<CacheKey> {
        let mut state = self.lock();
        state.in_flight = false;
        if state.keys.is_empty() {
            self.idle.notify_all();
        }

        loop {
            if self.is_stopped() {
                self.idle.notify_all();
                return None;
            }
            if let Some(key) = state.keys.pop() {
                state.in_flight = true;
                return Some(key);
            }
            if let Some(ready) = ready.take() {
                // Ignore send errors (constructor gave up waiting)
                let _ = ready.send(());
            }
            state = self
                .wake
                .wait_timeout(state, wait_timeout)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// Counters updated by the worker.
#[derive(Debug, Default)]
pub struct WorkerCounters {
    /// Resolutions that produced an icon
    pub found: AtomicU64,
    /// Resolutions that found nothing
    pub misses: AtomicU64,
    /// Resolutions that failed or panicked
    pub faults: AtomicU64,
    /// Keys skipped because they were already cached
    pub skipped: AtomicU64,
}

impl WorkerCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Found => Self::bump(&self.found),
            Outcome::Miss => Self::bump(&self.misses),
            Outcome::Fault => Self::bump(&self.faults),
        }
    }
}

/// How a single resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    Miss,
    Fault,
}

/// Call the resolver, turning errors and panics into an empty icon.
pub fn resolve_guarded<I: IconResource>(
    resolver: &dyn IconResolver<I>,
    key: &CacheKey,
) -> (IconHandle<I>, Outcome) {
    match panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve(key))) {
        Ok(Ok(handle)) => {
            let outcome = if handle.is_empty() {
                Outcome::Miss
            } else {
                Outcome::Found
            };
            trace!(key = %key, ?outcome, "icon resolved");
            (handle, outcome)
        }
        Ok(Err(err)) => {
            warn!(key = %key, error = %err, "icon resolution failed");
            (IconHandle::empty(), Outcome::Fault)
        }
        Err(payload) => {
            error!(key = %key, panic = panic_message(&*payload), "icon resolver panicked");
            (IconHandle::empty(), Outcome::Fault)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

/// Everything the worker thread needs.
pub struct WorkerContext<I: IconResource> {
    pub workload: Arc<Workload>,
    pub store: Arc<BoundedStore<I>>,
    pub resolver: Arc<dyn IconResolver<I>>,
    pub counters: Arc<WorkerCounters>,
    pub wait_timeout: Duration,
}

/// Spawn the worker thread and wait until it is waiting for work.
pub fn spawn_worker<I: IconResource>(ctx: WorkerContext<I>) -> Result<JoinHandle<()>, CacheError> {
    let (ready_tx, ready_rx) = mpsc::sync_channel::<()>(0);

    let handle = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || worker_loop(ctx, ready_tx))
        .map_err(CacheError::WorkerSpawn)?;

    ready_rx.recv().map_err(|_| CacheError::WorkerNotReady)?;
    Ok(handle)
}

fn worker_loop<I: IconResource>(ctx: WorkerContext<I>, ready: SyncSender<()>) {
    debug!("icon worker started");
    let mut ready = Some(ready);

    while let Some(key) = ctx.workload.next_key(ctx.wait_timeout, &mut ready) {
        if ctx.store.contains(&key) {
            WorkerCounters::bump(&ctx.counters.skipped);
            continue;
        }

        let (handle, outcome) = resolve_guarded(ctx.resolver.as_ref(), &key);
        ctx.counters.record(outcome);
        ctx.store.insert(key, handle);
    }

    debug!("icon worker stopped");
}
