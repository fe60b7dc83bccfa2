pub mod init;
pub mod install;
pub mod link;
pub mod show;
pub mod status;
pub mod unlink;
pub mod up;

use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::config::UserConfiguration;
use crate::packages::PackageManager;
use crate::platform::Platform;

/// Settings shared by every subcommand, resolved once from the command line.
pub struct Context {
    pub config_path: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
    /// Backend forced with `--package-manager`
    pub package_manager: Option<PackageManager>,
}

impl Context {
    pub fn new(
        config_path: Option<PathBuf>,
        dry_run: bool,
        verbose: bool,
        package_manager: Option<String>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => UserConfiguration::default_path()?,
        };
        let package_manager = package_manager
            .map(|tag| tag.parse::<PackageManager>())
            .transpose()?;

        Ok(Self {
            config_path,
            dry_run,
            verbose,
            package_manager,
        })
    }

    pub fn load_config(&self) -> Result<UserConfiguration> {
        UserConfiguration::load(&self.config_path)
            .context("Run 'rigup init' to create a configuration")
    }

    pub fn platform(&self) -> Platform {
        let mut platform = Platform::detect();
        if self.package_manager.is_some() {
            platform.package_manager = self.package_manager;
        }
        platform
    }

    pub fn home(&self) -> Result<PathBuf> {
        dirs::home_dir().context("Could not determine home directory")
    }
}
