//! Bounded key -> icon store with FIFO eviction
//!
//! Entries are never updated once inserted. When the store grows past its
//! limit, the entry inserted first is dropped, regardless of how recently it
//! was read.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::icon::{CacheKey, IconHandle, IconResource};

/// Default maximum number of resident icons.
pub const DEFAULT_MAX_ENTRIES: usize = 800;

struct StoreInner<I: IconResource> {
    /// Cached entries (key -> icon)
    entries: HashMap<CacheKey, IconHandle<I>>,
    /// Insertion order (front = oldest, back = newest)
    order: VecDeque<CacheKey>,
    /// Entries dropped to stay within the limit
    evicted: u64,
}

/// Consistent view of the store taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub entries: usize,
    pub queue_len: usize,
    pub evicted: u64,
    pub resident_bytes: usize,
}

/// Thread-safe bounded icon store.
pub struct BoundedStore<I: IconResource> {
    inner: Mutex<StoreInner<I>>,
    max_entries: usize,
}

impl<I: IconResource> BoundedStore<I> {
    /// Create a store holding at most `max_entries` icons (at least one).
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                evicted: 0,
            }),
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner<I>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a copy of the cached icon, or `None` if the key is not cached.
    ///
    /// Reads do not affect eviction order.
    pub fn try_get(&self, key: &CacheKey) -> Option<IconHandle<I>> {
        self.lock().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Insert an icon unless the key is already cached.
    ///
    /// Returns `false` (and keeps the existing icon) when the key was
    /// present. Evicts the oldest entry if the store grows past its limit.
    pub fn insert(&self, key: CacheKey, handle: IconHandle<I>) -> bool {
        let evicted = {
            let mut inner = self.lock();
            if inner.entries.contains_key(&key) {
                return false;
            }

            inner.entries.insert(key.clone(), handle);
            inner.order.push_back(key);

            let mut evicted = None;
            if inner.entries.len() > self.max_entries {
                if let Some(oldest) = inner.order.pop_front() {
                    evicted = inner.entries.remove(&oldest);
                    inner.evicted += 1;
                }
            }
            evicted
        };
        // Release the evicted icon outside the lock
        drop(evicted);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn queue_len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.lock();
        StoreSnapshot {
            entries: inner.entries.len(),
            queue_len: inner.order.len(),
            evicted: inner.evicted,
            resident_bytes: inner.entries.values().map(IconHandle::byte_size).sum(),
        }
    }
}
