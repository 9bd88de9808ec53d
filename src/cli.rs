//! CLI definitions for iconcache
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build clap styles for consistent CLI appearance.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "iconcache")]
#[command(about = "Resolve and cache file-type icons the way a file list does")]
#[command(
    long_about = "iconcache - Bounded, asynchronously populated icon cache.

Classifies filesystem entries into cache keys (per-file for executables,
shortcuts and desktop entries; per-extension for everything else), and
resolves their icons from freedesktop icon themes on a background worker.

QUICK START:
    iconcache classify ~/Downloads/*     Show the cache key of each path
    iconcache scan ~/Documents           Resolve icons for a directory
    iconcache config show                Show current configuration

Set ICONCACHE_LOG (e.g. ICONCACHE_LOG=debug) to control diagnostics."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Enable debug diagnostics on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Use this config file instead of ~/.config/iconcache/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the cache key for each path
    #[command(long_about = "Print the cache key each path is stored under.

Directories share one key, files with per-file icons are keyed by path,
and everything else is keyed by its lowercase extension.

EXAMPLE:
    iconcache classify setup.exe notes.TXT /tmp

OUTPUT:
    setup.exe	setup.exe
    notes.TXT	*.txt
    /tmp	<directory>")]
    Classify {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Resolve icons for every entry of a directory
    #[command(long_about = "List a directory, classify its entries and resolve their icons.

Keys are submitted the way a file list would submit its visible rows:
in frames, most-wanted first, each frame replacing the previous workload.
The command waits for the worker to go idle and prints a summary.

EXAMPLES:
    iconcache scan ~/Documents
    iconcache scan /usr/share --recursive --max-entries 200
    iconcache scan . --json")]
    Scan {
        /// Directory to scan
        dir: PathBuf,
        /// Descend into subdirectories
        #[arg(long, short)]
        recursive: bool,
        /// Override cache.max_entries
        #[arg(long)]
        max_entries: Option<usize>,
        /// Keys submitted per frame
        #[arg(long, default_value_t = 64)]
        frame: usize,
        /// Give up waiting after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
}
