use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Failed to save config {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize config")]
    Serialize(#[from] serde_yaml::Error),
}

/// The dotfiles root could not be opened or walked.
#[derive(Debug, Error)]
#[error("Failed to read dotfiles at {}", path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure while realising a single mapping. Never aborts the remaining ones.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to backup {} to {}", path.display(), backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove {}", path.display())]
    Removal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create parent dir {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create symlink {} -> {}", target.display(), link.display())]
    LinkCreation {
        target: PathBuf,
        link: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to install {package} with {manager}: {detail}")]
    Install {
        package: String,
        manager: String,
        detail: String,
    },

    #[error("Failed to update {manager} package index: {detail}")]
    Update { manager: String, detail: String },

    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Unknown package manager: {0} (expected apt, brew, pacman or dnf)")]
    UnknownBackend(String),
}

/// An error and its causes on one line, the way anyhow's `{:#}` prints them.
pub fn chain(error: &dyn StdError) -> String {
    let mut text = error.to_string();
    let mut cause = error.source();
    while let Some(err) = cause {
        text.push_str(": ");
        text.push_str(&err.to_string());
        cause = err.source();
    }
    text
}
