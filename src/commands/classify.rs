//! Classify command handler

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::load_config;

/// Print the cache key of each path, one `path<TAB>key` line per path.
pub fn handle(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<()> {
    let policy = load_config(config_path)?.key_policy();
    for path in paths {
        println!("{}\t{}", path.display(), policy.classify_path(path));
    }
    Ok(())
}
