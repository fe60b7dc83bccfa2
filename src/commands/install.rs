use anyhow::{Context as _, Result};
use colored::Colorize;
use tracing::info;

use super::Context;
use crate::config::UserConfiguration;
use crate::exec::SystemRunner;
use crate::packages::{wanted_packages, InstallSummary, Installer, PackageManager};

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let manager = ctx
        .platform()
        .package_manager
        .context("No supported package manager found; pass --package-manager")?;

    install_packages(ctx, &config, manager)?;
    Ok(())
}

/// Refresh the package index, then install everything the configuration asks for.
/// In dev mode the commands are only logged.
pub fn install_packages(
    ctx: &Context,
    config: &UserConfiguration,
    manager: PackageManager,
) -> Result<InstallSummary> {
    let dry_run = ctx.dry_run || config.dev_mode;
    if config.dev_mode {
        info!("dev mode: package commands are logged, not run");
    }

    let wanted = wanted_packages(config);
    println!("{} ({} packages):", format!("Installing with {}", manager).bold(), wanted.len());

    let runner = SystemRunner;
    let installer = Installer::new(manager, &runner, dry_run);
    installer.update()?;

    let summary = installer
        .install_all(&wanted)
        .context("Package installation stopped")?;

    println!(
        "  {} installed, {} already present, {} unavailable",
        summary.installed.len(),
        summary.already_present.len(),
        summary.unavailable.len()
    );
    println!();

    Ok(summary)
}
