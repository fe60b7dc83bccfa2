use anyhow::Result;
use colored::Colorize;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    println!("{}:", ctx.config_path.display().to_string().bold());
    for (label, value) in config.summary() {
        println!("  {:<18}{}", label, value);
    }

    Ok(())
}
