//! Directory scanning driven like a file-list view
//!
//! Lists a directory, classifies every entry into a cache key, and feeds the
//! missing keys to an `IconCache` frame by frame, the way a list view asks
//! for the rows currently on screen.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheStats, IconCache};
use crate::icon::{CacheKey, EntryKind, IconResource, KeyPolicy};

/// Granularity at which waiting checks for interruption.
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// One listed filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// List `dir`, directories first, each group sorted by name.
///
/// Unreadable subdirectories are skipped when `recursive` is set; an
/// unreadable `dir` itself is an error.
pub fn list_entries(dir: &Path, recursive: bool) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    collect_entries(dir, recursive, &mut entries, true)?;
    Ok(entries)
}

fn collect_entries(
    dir: &Path,
    recursive: bool,
    out: &mut Vec<Entry>,
    top_level: bool,
) -> io::Result<()> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if !top_level => {
            debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut listed: Vec<Entry> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let kind = EntryKind::of(&path);
            Entry { path, kind }
        })
        .collect();
    listed.sort_by(|a, b| {
        let a_file = a.kind == EntryKind::File;
        let b_file = b.kind == EntryKind::File;
        a_file.cmp(&b_file).then_with(|| a.path.cmp(&b.path))
    });

    for entry in listed {
        // Don't follow symlinked directories when recursing
        let descend = recursive
            && entry.kind == EntryKind::Directory
            && !entry.path.is_symlink();
        let path = entry.path.clone();
        out.push(entry);
        if descend {
            collect_entries(&path, recursive, out, false)?;
        }
    }
    Ok(())
}

/// Distinct keys in first-seen order.
pub fn distinct_keys(policy: &KeyPolicy, entries: &[Entry]) -> Vec<CacheKey> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| policy.classify(&entry.path, entry.kind))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Complete,
    TimedOut,
    Interrupted,
}

/// Result of feeding a directory's keys through the cache.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub dir: PathBuf,
    pub entries: usize,
    pub distinct_keys: usize,
    /// Keys that resolved to an icon and are still resident
    pub with_icon: usize,
    /// Keys resolved to "no icon" (misses and faults)
    pub without_icon: usize,
    /// Keys not resident at the end (evicted or never reached)
    pub not_resident: usize,
    pub status: ScanStatus,
    pub stats: CacheStats,
}

/// Submit `keys` to `cache` in frames and wait for each frame to resolve.
///
/// Within a frame, keys are submitted so the first one is resolved first.
/// Stops early when `timeout` elapses or `interrupted` is set.
pub fn feed_frames<I: IconResource>(
    cache: &IconCache<I>,
    keys: &[CacheKey],
    frame: usize,
    timeout: Duration,
    interrupted: &AtomicBool,
) -> ScanStatus {
    let deadline = Instant::now() + timeout;

    for (index, chunk) in keys.chunks(frame.max(1)).enumerate() {
        // Worker pops from the end, so reverse to serve the top row first
        let missing: Vec<CacheKey> = chunk
            .iter()
            .rev()
            .filter(|key| cache.request_icon(key).is_none())
            .cloned()
            .collect();
        debug!(frame = index, missing = missing.len(), "submitting frame");
        cache.set_workload(missing);

        loop {
            if interrupted.load(Ordering::SeqCst) {
                return ScanStatus::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return ScanStatus::TimedOut;
            }
            if cache.wait_idle(WAIT_SLICE.min(deadline - now)) {
                break;
            }
        }
    }
    ScanStatus::Complete
}

/// Classify the entries, feed them through `cache`, and report.
pub fn scan_entries<I: IconResource>(
    cache: &IconCache<I>,
    policy: &KeyPolicy,
    dir: &Path,
    entries: &[Entry],
    frame: usize,
    timeout: Duration,
    interrupted: &AtomicBool,
) -> ScanReport {
    let keys = distinct_keys(policy, entries);
    let status = feed_frames(cache, &keys, frame, timeout, interrupted);

    let mut with_icon = 0;
    let mut without_icon = 0;
    let mut not_resident = 0;
    for key in &keys {
        match cache.request_icon(key) {
            Some(handle) if handle.is_empty() => without_icon += 1,
            Some(_) => with_icon += 1,
            None => not_resident += 1,
        }
    }

    ScanReport {
        dir: dir.to_path_buf(),
        entries: entries.len(),
        distinct_keys: keys.len(),
        with_icon,
        without_icon,
        not_resident,
        status,
        stats: cache.stats(),
    }
}
