use anyhow::{bail, Result};
use colored::Colorize;

use super::Context;
use crate::config::UserConfiguration;
use crate::linker::{LinkOptions, LinkSummary, Linker};
use crate::resolver::discover_for;

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let summary = link_dotfiles(ctx, &config)?;
    check_summary(&summary)
}

pub fn link_dotfiles(ctx: &Context, config: &UserConfiguration) -> Result<LinkSummary> {
    let home = ctx.home()?;
    let mappings = discover_for(config, &home)?;

    println!("{} ({} items):", config.dotfiles_path.bold(), mappings.len());
    if mappings.is_empty() {
        println!("  (no items to link)");
    }

    let linker = Linker::new(LinkOptions::from_config(config, ctx.dry_run, ctx.verbose));
    let summary = linker.link_all(&mappings);

    println!(
        "  {} changed, {} unchanged, {} failed",
        summary.changed, summary.unchanged, summary.failed
    );

    if ctx.dry_run {
        println!();
        println!("{}", "(dry run - no changes made)".dimmed());
    }

    Ok(summary)
}

/// Any failed mapping turns the whole run into an error exit.
pub fn check_summary(summary: &LinkSummary) -> Result<()> {
    if summary.failed > 0 {
        bail!(
            "{} of {} dotfiles failed to link",
            summary.failed,
            summary.total()
        );
    }
    Ok(())
}
