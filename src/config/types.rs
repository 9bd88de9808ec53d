//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_WAIT_TIMEOUT};
use crate::icon::key::DEFAULT_FILE_SPECIFIC_EXTENSIONS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Icon cache sizing and worker behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of resident icons
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// How long the idle worker sleeps between shutdown checks
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

pub fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

pub fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT.as_millis() as u64
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

/// Cache key classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Extensions whose icon is specific to each file (keyed by full path)
    #[serde(default = "default_file_specific_extensions")]
    pub file_specific_extensions: Vec<String>,
}

pub fn default_file_specific_extensions() -> Vec<String> {
    DEFAULT_FILE_SPECIFIC_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            file_specific_extensions: default_file_specific_extensions(),
        }
    }
}

/// Icon theme lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Icon theme searched before hicolor
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Nominal icon size in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    /// Icon base directories (empty = platform defaults)
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

pub fn default_theme() -> String {
    "hicolor".to_string()
}

pub fn default_size() -> u32 {
    16
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            size: default_size(),
            search_dirs: Vec::new(),
        }
    }
}
