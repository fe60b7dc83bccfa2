use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::resolver::discover_for;
use crate::status::{check_mapping_status, ItemStatus, LinkStatus};

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let home = ctx.home()?;
    let mappings = discover_for(&config, &home)?;

    let mut status = LinkStatus::default();

    for mapping in &mappings {
        let item_status = check_mapping_status(mapping);
        status.record(&item_status);

        if ctx.verbose {
            let symbol = match &item_status {
                ItemStatus::Linked => "✓".green(),
                ItemStatus::External(_) => "⊘".yellow(),
                ItemStatus::Missing => "?".red(),
                ItemStatus::Conflict => "!".red(),
            };
            let note = match &item_status {
                ItemStatus::External(path) => format!(" (external: {})", path),
                _ => String::new(),
            };
            println!("  {} {}{}", symbol, mapping.display_name(), note.dimmed());
        }
    }

    println!("{} ({} items):", config.dotfiles_path.bold(), status.total());
    println!("  linked:   {}", status.linked.to_string().green());
    if status.external > 0 {
        println!(
            "  external: {}  (symlink points elsewhere)",
            status.external.to_string().yellow()
        );
    }
    if status.missing > 0 {
        println!(
            "  missing:  {}  (in repo but not linked)",
            status.missing.to_string().red()
        );
    }
    if status.conflict > 0 {
        println!(
            "  conflict: {}  (file exists, not a symlink)",
            status.conflict.to_string().red()
        );
    }

    Ok(())
}
