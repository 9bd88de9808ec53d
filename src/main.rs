//! iconcache - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use iconcache::cli::{Cli, Commands, ConfigCommands};

use commands::scan::ScanArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    iconcache::logging::init(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Classify { paths } => commands::classify::handle(config_path, &paths),
        Commands::Scan {
            dir,
            recursive,
            max_entries,
            frame,
            timeout_secs,
            json,
        } => commands::scan::handle(
            config_path,
            ScanArgs {
                dir,
                recursive,
                max_entries,
                frame,
                timeout: Duration::from_secs(timeout_secs),
                json,
            },
        ),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
        },
    }
}
