use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{self, NONE};
use crate::error::ConfigError;
use crate::shell::Shell;

/// Everything the user chose in the wizard.
/// Persisted at ~/.config/rigup/config.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfiguration {
    pub shell: Shell,
    pub plugin_manager: String,
    pub prompt: String,
    pub cli_tools: Vec<String>,
    pub languages: Vec<String>,
    /// Language -> package manager, only for languages in `languages`
    pub package_managers: BTreeMap<String, String>,
    pub dotfiles_path: String,
    pub use_relative_links: bool,
    pub backup_existing: bool,
    pub editors: Vec<String>,
    pub dev_mode: bool,
}

impl Default for UserConfiguration {
    fn default() -> Self {
        Self {
            shell: Shell::default(),
            plugin_manager: NONE.to_string(),
            prompt: NONE.to_string(),
            cli_tools: Vec::new(),
            languages: Vec::new(),
            package_managers: BTreeMap::new(),
            dotfiles_path: catalog::DEFAULT_DOTFILES_PATH.to_string(),
            use_relative_links: false,
            backup_existing: true,
            editors: Vec::new(),
            dev_mode: false,
        }
    }
}

impl UserConfiguration {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Save {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, content).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default location, ~/.config/rigup/config.yaml
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("rigup");

        Ok(config_dir.join("config.yaml"))
    }

    pub fn expanded_dotfiles_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.dotfiles_path);
        PathBuf::from(expanded.as_ref())
    }

    /// Checks the cross-field rules the wizard guarantees.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !catalog::is_plugin_manager_for(self.shell, &self.plugin_manager) {
            return Err(format!(
                "plugin manager '{}' is not available for {}",
                self.plugin_manager, self.shell
            ));
        }

        if !catalog::is_known(catalog::PROMPTS, &self.prompt) {
            return Err(format!("unknown prompt '{}'", self.prompt));
        }

        if let Some(language) = self
            .languages
            .iter()
            .find(|l| !catalog::is_known(catalog::LANGUAGES, l))
        {
            return Err(format!("unknown language '{}'", language));
        }

        for (language, manager) in &self.package_managers {
            if !self.languages.contains(language) {
                return Err(format!(
                    "package manager set for '{}', which is not a selected language",
                    language
                ));
            }
            if !catalog::valid_managers(language).contains(&manager.as_str()) {
                return Err(format!(
                    "'{}' is not a package manager for {}",
                    manager, language
                ));
            }
        }

        if self.dotfiles_path.trim().is_empty() {
            return Err("dotfiles_path is empty".to_string());
        }

        Ok(())
    }

    /// Label/value pairs for displaying the configuration.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let managers = self
            .package_managers
            .iter()
            .map(|(lang, manager)| format!("{}={}", lang, manager))
            .collect::<Vec<_>>();

        vec![
            ("Shell", self.shell.to_string()),
            ("Plugin manager", self.plugin_manager.clone()),
            ("Prompt", self.prompt.clone()),
            ("CLI tools", join_or_none(&self.cli_tools)),
            ("Languages", join_or_none(&self.languages)),
            ("Package managers", join_or_none(&managers)),
            ("Editors", join_or_none(&self.editors)),
            ("Dotfiles", self.dotfiles_path.clone()),
            ("Relative links", yes_no(self.use_relative_links)),
            ("Backup existing", yes_no(self.backup_existing)),
            ("Dev mode", yes_no(self.dev_mode)),
        ]
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}
