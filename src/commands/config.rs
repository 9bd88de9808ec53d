//! Config subcommands handler

use anyhow::Result;
use std::path::Path;

use iconcache::Config;

use super::load_config;

/// Show the effective configuration as TOML.
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    print!("{}", toml_str);
    Ok(())
}

/// Print the path the configuration is read from.
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}
