//! Scan command handler

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use iconcache::icon::IconImage;
use iconcache::scan::{list_entries, scan_entries, ScanReport, ScanStatus};
use iconcache::IconCache;

use super::load_config;

/// Options of the `scan` command.
pub struct ScanArgs {
    pub dir: PathBuf,
    pub recursive: bool,
    pub max_entries: Option<usize>,
    pub frame: usize,
    pub timeout: Duration,
    pub json: bool,
}

/// Resolve icons for a directory and print a summary.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>, args: ScanArgs) -> Result<()> {
    let config = load_config(config_path)?;

    let mut options = config.cache_options();
    if let Some(max_entries) = args.max_entries {
        anyhow::ensure!(max_entries > 0, "--max-entries must be > 0");
        options.max_entries = max_entries;
    }

    let entries = list_entries(&args.dir, args.recursive)
        .with_context(|| format!("Failed to list directory: {}", args.dir.display()))?;

    let cache: IconCache<IconImage> = IconCache::new(Arc::new(config.theme_resolver()), options)
        .context("Failed to start icon cache")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .ok(); // Ignore if handler already set

    let report = scan_entries(
        &cache,
        &config.key_policy(),
        &args.dir,
        &entries,
        args.frame,
        args.timeout,
        &interrupted,
    );
    cache.shutdown();

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    let stats = &report.stats;
    println!(
        "Scanned {}: {} entries, {} distinct keys",
        report.dir.display(),
        report.entries,
        report.distinct_keys
    );
    println!("  Icons found:     {:>6}", report.with_icon);
    println!("  No icon:         {:>6}", report.without_icon);
    println!("  Not resident:    {:>6}", report.not_resident);
    println!("  Resolver faults: {:>6}", stats.faults);
    println!("  Evicted:         {:>6}", stats.evicted);
    println!(
        "  Resident icons:  {:>6} / {} ({})",
        stats.entries,
        stats.max_entries,
        format_size(stats.resident_bytes, BINARY)
    );

    match report.status {
        ScanStatus::Complete => {}
        ScanStatus::TimedOut => println!("Timed out before all icons were resolved."),
        ScanStatus::Interrupted => println!("Interrupted."),
    }
}
