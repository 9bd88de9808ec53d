//! Command handlers for the iconcache CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod classify;
pub mod config;
pub mod scan;

use anyhow::Result;
use std::path::Path;

use iconcache::Config;

/// Load the config from `--config` if given, otherwise from the default path.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
