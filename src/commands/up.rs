use anyhow::Result;
use tracing::{error, warn};

use super::install::install_packages;
use super::link::{check_summary, link_dotfiles};
use super::Context;

/// Install packages, then link. A failed install still lets linking run;
/// the command fails afterwards.
pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    let installed = match ctx.platform().package_manager {
        Some(manager) => install_packages(ctx, &config, manager).map(|_| ()),
        None => {
            warn!("no supported package manager found, skipping package installation");
            Ok(())
        }
    };

    let linked = link_dotfiles(ctx, &config).and_then(|summary| check_summary(&summary));

    match (installed, linked) {
        (Err(install), Err(link)) => {
            error!("{:#}", install);
            Err(link)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
