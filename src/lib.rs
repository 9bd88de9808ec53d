//! iconcache Library
//!
//! A bounded, thread-safe icon cache for file-list views: lookups are served
//! from the caller's thread while misses are resolved on a background worker.

pub mod cache;
pub mod cli;
pub mod config;
pub mod icon;
pub mod logging;
pub mod scan;

pub use cache::{CacheOptions, CacheStats, IconCache};
pub use config::Config;
pub use crate::icon::{CacheKey, EntryKind, IconHandle, IconResolver, IconResource, KeyPolicy};
