use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::linker::{print_failure, print_result, LinkOptions, Linker};
use crate::resolver::discover_for;

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let home = ctx.home()?;
    let mappings = discover_for(&config, &home)?;

    println!("{}:", config.dotfiles_path.bold());
    if mappings.is_empty() {
        println!("  (no items)");
    }

    let linker = Linker::new(LinkOptions::from_config(&config, ctx.dry_run, ctx.verbose));

    for mapping in &mappings {
        match linker.unlink(mapping) {
            Ok(result) => print_result(&mapping.display_name(), &result, ctx.verbose),
            Err(e) => print_failure(&mapping.display_name(), &e),
        }
    }

    if ctx.dry_run {
        println!();
        println!("{}", "(dry run - no changes made)".dimmed());
    }

    Ok(())
}
