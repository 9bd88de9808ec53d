//! Shared fixtures for cache integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iconcache::cache::{CacheOptions, IconCache};
use iconcache::icon::ResolveError;
use iconcache::{CacheKey, IconHandle, IconResource};

/// Generous upper bound for the worker to go idle in tests
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Icon resource that counts live copies and remembers its key
pub struct CountedIcon {
    pub key: CacheKey,
    live: Arc<AtomicUsize>,
}

impl CountedIcon {
    pub fn new(key: CacheKey, live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            key,
            live: Arc::clone(live),
        }
    }
}

impl IconResource for CountedIcon {
    fn duplicate(&self) -> Option<Self> {
        Some(CountedIcon::new(self.key.clone(), &self.live))
    }
}

impl Drop for CountedIcon {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Records every key the resolver was called with, in call order
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<CacheKey>>>,
}

impl CallLog {
    pub fn record(&self, key: &CacheKey) {
        self.calls.lock().unwrap().push(key.clone());
    }

    pub fn calls(&self) -> Vec<CacheKey> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, key: &CacheKey) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| *k == key).count()
    }
}

pub fn ext(name: &str) -> CacheKey {
    CacheKey::Extension(name.to_string())
}

pub fn options(max_entries: usize) -> CacheOptions {
    CacheOptions {
        max_entries,
        wait_timeout: Duration::from_millis(10),
    }
}

/// Cache whose resolver logs calls and produces counted icons.
///
/// Keys named `fail*` return an error, `none*` resolve to nothing, and
/// `panic*` make the resolver panic.
pub fn counted_cache(
    max_entries: usize,
    live: &Arc<AtomicUsize>,
    log: &CallLog,
) -> IconCache<CountedIcon> {
    let live = Arc::clone(live);
    let log = log.clone();
    IconCache::with_resolver(
        move |key: &CacheKey| -> Result<IconHandle<CountedIcon>, ResolveError> {
            log.record(key);
            match key {
                CacheKey::Extension(name) if name.starts_with("fail") => {
                    Err(ResolveError::Unsupported(name.clone()))
                }
                CacheKey::Extension(name) if name.starts_with("none") => Ok(IconHandle::empty()),
                CacheKey::Extension(name) if name.starts_with("panic") => {
                    panic!("resolver blew up on {}", name)
                }
                _ => Ok(IconHandle::new(CountedIcon::new(key.clone(), &live))),
            }
        },
        options(max_entries),
    )
    .expect("Failed to start cache")
}

/// Write `<root>/<theme>/index.theme` declaring 16px fixed directories.
pub fn write_theme_index(root: &Path, theme: &str, dirs: &[&str]) {
    let mut index = format!("[Icon Theme]\nName={}\nDirectories={}\n", theme, dirs.join(","));
    for dir in dirs {
        index.push_str(&format!("\n[{}]\nSize=16\nType=Fixed\n", dir));
    }
    let path = root.join(theme).join("index.theme");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, index).unwrap();
}
