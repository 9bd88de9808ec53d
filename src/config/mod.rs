//! Configuration management for iconcache

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheOptions;
use crate::icon::{KeyPolicy, ThemeResolver};

/// Upper bound for `cache.wait_timeout_ms` (10 seconds).
pub const MAX_WAIT_TIMEOUT_MS: u64 = 10_000;

impl Config {
    /// Get the config file path (~/.config/iconcache/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/iconcache)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from an explicit path, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        io::save(self)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Validate configuration values.
    ///
    /// Returns an error describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache.max_entries == 0 {
            return Err("cache.max_entries must be > 0".to_string());
        }
        if self.cache.wait_timeout_ms == 0 {
            return Err("cache.wait_timeout_ms must be > 0".to_string());
        }
        if self.cache.wait_timeout_ms > MAX_WAIT_TIMEOUT_MS {
            return Err(format!(
                "cache.wait_timeout_ms {} exceeds maximum ({})",
                self.cache.wait_timeout_ms, MAX_WAIT_TIMEOUT_MS
            ));
        }
        if self.resolver.size == 0 {
            return Err("resolver.size must be > 0".to_string());
        }
        if self.resolver.theme.trim().is_empty() {
            return Err("resolver.theme must not be empty".to_string());
        }
        Ok(())
    }

    /// Construction parameters for an `IconCache`
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            max_entries: self.cache.max_entries,
            wait_timeout: Duration::from_millis(self.cache.wait_timeout_ms),
        }
    }

    /// Key policy built from `keys.file_specific_extensions`
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::new(&self.keys.file_specific_extensions)
    }

    /// Theme resolver built from the `[resolver]` section
    pub fn theme_resolver(&self) -> ThemeResolver {
        ThemeResolver::new(
            &self.resolver.theme,
            self.resolver.size,
            self.resolver.search_dirs.clone(),
        )
    }
}
