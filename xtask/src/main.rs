//! xtask - Build tasks for iconcache
//!
//! Run with: cargo xtask <command>
//!
//! Commands:
//! - gen-docs: Generate documentation (man pages, COMMANDS.md)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand};

use iconcache::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build tasks for iconcache")]
struct Xtask {
    #[command(subcommand)]
    command: XtaskCommand,
}

#[derive(Subcommand)]
enum XtaskCommand {
    /// Generate documentation from CLI definitions
    #[command(name = "gen-docs")]
    GenDocs {
        /// Output directory (default: docs/)
        #[arg(long, short, default_value = "docs")]
        output: PathBuf,

        /// Generate man pages
        #[arg(long)]
        man: bool,

        /// Generate COMMANDS.md
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> Result<()> {
    let args = Xtask::parse();

    match args.command {
        XtaskCommand::GenDocs {
            output,
            man,
            markdown,
        } => {
            // If no specific format is specified, generate both
            let gen_all = !man && !markdown;

            if gen_all || man {
                generate_man_pages(&output)?;
            }
            if gen_all || markdown {
                generate_markdown(&output)?;
            }
        }
    }

    Ok(())
}

/// Render one man page per (sub)command, named like `iconcache-config-show.1`
fn generate_man_pages(output: &Path) -> Result<()> {
    let man_dir = output.join("man");
    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;

    render_man_tree(&man_dir, &Cli::command(), "iconcache")?;

    println!("Man pages generated in {}", man_dir.display());
    Ok(())
}

fn render_man_tree(man_dir: &Path, cmd: &Command, stem: &str) -> Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    let file = man_dir.join(format!("{}.1", stem));
    fs::write(&file, buffer).with_context(|| format!("Failed to write {}", file.display()))?;
    println!("Generated: {}", file.display());

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        render_man_tree(man_dir, sub, &format!("{}-{}", stem, sub.get_name()))?;
    }
    Ok(())
}

/// Generate COMMANDS.md markdown documentation
fn generate_markdown(output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let cmd = Cli::command();
    let mut markdown = String::new();

    markdown.push_str("# iconcache Command Reference\n\n");
    markdown.push_str("This document is auto-generated from the CLI definitions.\n\n");

    markdown.push_str("## iconcache\n\n");
    if let Some(about) = cmd.get_about() {
        markdown.push_str(&format!("{}\n\n", about));
    }
    if let Some(long_about) = cmd.get_long_about() {
        markdown.push_str(&format!("```\n{}\n```\n\n", long_about));
    }

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        write_command_markdown(&mut markdown, sub, &format!("iconcache {}", sub.get_name()), 2);
    }

    let file = output.join("COMMANDS.md");
    fs::write(&file, markdown).with_context(|| format!("Failed to write {}", file.display()))?;
    println!("Generated: {}", file.display());
    Ok(())
}

fn write_command_markdown(out: &mut String, cmd: &Command, title: &str, level: usize) {
    out.push_str(&format!("{} {}\n\n", "#".repeat(level), title));

    if let Some(about) = cmd.get_about() {
        out.push_str(&format!("{}\n\n", about));
    }

    let args: Vec<_> = cmd
        .get_arguments()
        .filter(|a| {
            let id = a.get_id().as_str();
            id != "help" && id != "version"
        })
        .collect();

    for arg in args.iter().filter(|a| a.is_positional()) {
        out.push_str(&format!("- `<{}>`", arg.get_id().as_str().to_uppercase()));
        if let Some(help) = arg.get_help() {
            out.push_str(&format!(": {}", help));
        }
        out.push('\n');
    }

    for arg in args.iter().filter(|a| !a.is_positional()) {
        let long = arg.get_long().map(|l| format!("--{}", l));
        let short = arg.get_short().map(|s| format!("-{}", s));
        let flag = match (long, short) {
            (Some(l), Some(s)) => format!("{}, {}", s, l),
            (Some(l), None) => l,
            (None, Some(s)) => s,
            _ => continue,
        };
        out.push_str(&format!("- `{}`", flag));
        if let Some(help) = arg.get_help() {
            out.push_str(&format!(": {}", help));
        }
        out.push('\n');
    }
    if !args.is_empty() {
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("```\n{}\n```\n\n", long_about));
    }

    for nested in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let nested_title = format!("{} {}", title, nested.get_name());
        write_command_markdown(out, nested, &nested_title, level + 1);
    }
}
