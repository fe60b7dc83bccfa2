mod catalog;
mod commands;
mod config;
mod error;
mod exec;
mod linker;
mod logging;
mod packages;
mod paths;
mod platform;
mod resolver;
mod shell;
mod status;
mod tui;
mod wizard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::exit;
use tracing::error;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "rigup")]
#[command(about = "Interactive workstation setup: shell, tools, languages and dotfiles")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/rigup/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show what would happen without making changes
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Package manager to use instead of the detected one (apt, brew, pacman, dnf)
    #[arg(long, global = true)]
    package_manager: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the setup questions and save the configuration
    Init,

    /// Install packages, then link dotfiles
    #[command(alias = "apply")]
    Up,

    /// Symlink the dotfiles repo into the home directory
    Link,

    /// Remove symlinks that point into the dotfiles repo
    Unlink,

    /// Install packages for the saved configuration
    Install,

    /// Show symlink status
    Status,

    /// Print the saved configuration
    Show,
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(
        cli.config,
        cli.dry_run,
        cli.verbose,
        cli.package_manager,
    )?;

    match cli.command {
        Commands::Init => commands::init::run(&ctx),
        Commands::Up => commands::up::run(&ctx),
        Commands::Link => commands::link::run(&ctx),
        Commands::Unlink => commands::unlink::run(&ctx),
        Commands::Install => commands::install::run(&ctx),
        Commands::Status => commands::status::run(&ctx),
        Commands::Show => commands::show::run(&ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        exit(1);
    }
}
