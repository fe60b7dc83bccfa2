use anyhow::Result;
use colored::Colorize;
use tracing::{debug, info};

use super::Context;
use crate::config::UserConfiguration;
use crate::error::chain;
use crate::tui;
use crate::wizard::Wizard;

pub fn run(ctx: &Context) -> Result<()> {
    let platform = ctx.platform();
    debug!(platform = %platform.describe(), "detected platform");

    let mut wizard = if ctx.config_path.exists() {
        match UserConfiguration::load(&ctx.config_path) {
            Ok(existing) => Wizard::with_defaults(&existing),
            Err(e) => {
                info!("starting from defaults: {}", chain(&e));
                Wizard::new()
            }
        }
    } else {
        Wizard::new()
    };
    wizard.set_platform(platform.describe());

    let Some(config) = tui::run(wizard)? else {
        println!("Setup cancelled, nothing saved.");
        return Ok(());
    };

    if ctx.dry_run {
        println!("{}", serde_yaml::to_string(&config)?);
        println!("{}", "(dry run - configuration not saved)".dimmed());
        return Ok(());
    }

    config.save(&ctx.config_path)?;
    println!(
        "  {} Saved {}",
        "✓".green(),
        ctx.config_path.display()
    );

    println!();
    println!("Next steps:");
    println!("  1. Put your dotfiles in {}", config.dotfiles_path);
    println!("  2. Run: rigup up");

    Ok(())
}
