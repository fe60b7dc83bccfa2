use chrono::Local;
use colored::Colorize;
use std::fs;
use std::io;
use std::os::unix::fs as unix_fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::UserConfiguration;
use crate::error::{chain, LinkError};
use crate::paths::{link_dir, normalize, relative_to, resolve_link_text};
use crate::resolver::DotfileMapping;

const BACKUP_TIMESTAMP: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkOptions {
    pub dry_run: bool,
    pub verbose: bool,
    /// Store link text relative to the link's directory
    pub relative: bool,
    /// Rename conflicting files instead of deleting them
    pub backup: bool,
}

impl LinkOptions {
    pub fn from_config(config: &UserConfiguration, dry_run: bool, verbose: bool) -> Self {
        Self {
            dry_run,
            verbose,
            relative: config.use_relative_links,
            backup: config.backup_existing,
        }
    }
}

#[derive(Debug)]
pub enum LinkResult {
    Created,
    AlreadyCorrect,
    /// A stale symlink was replaced
    Relinked,
    /// A conflicting file was deleted
    Replaced,
    BackedUp { backup_path: PathBuf },
    Unlinked,
    Skipped { reason: String },
}

/// Tally of one linking run.
#[derive(Debug, Default)]
pub struct LinkSummary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl LinkSummary {
    pub fn record(&mut self, result: &Result<LinkResult, LinkError>) {
        match result {
            Ok(LinkResult::AlreadyCorrect) | Ok(LinkResult::Skipped { .. }) => self.unchanged += 1,
            Ok(_) => self.changed += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.changed + self.unchanged + self.failed
    }
}

pub struct Linker {
    options: LinkOptions,
}

impl Linker {
    pub fn new(options: LinkOptions) -> Self {
        Self { options }
    }

    /// Apply every mapping in order. A failure never stops the ones after it.
    pub fn link_all(&self, mappings: &[DotfileMapping]) -> LinkSummary {
        let mut summary = LinkSummary::default();

        for mapping in mappings {
            let result = self.link(mapping);
            match &result {
                Ok(outcome) => {
                    print_result(&mapping.display_name(), outcome, self.options.verbose)
                }
                Err(e) => {
                    warn!(path = %mapping.source_relative.display(), "{}", chain(e));
                    print_failure(&mapping.display_name(), e);
                }
            }
            summary.record(&result);
        }

        summary
    }

    pub fn link(&self, mapping: &DotfileMapping) -> Result<LinkResult, LinkError> {
        if !mapping.needs_link {
            return Ok(LinkResult::AlreadyCorrect);
        }

        let target = &mapping.target_absolute;

        let outcome = if mapping.target_exists && !mapping.target_is_symlink {
            if self.options.backup {
                let backup_path = backup_path(target);
                if !self.options.dry_run {
                    fs::rename(target, &backup_path).map_err(|source| LinkError::Backup {
                        path: target.clone(),
                        backup: backup_path.clone(),
                        source,
                    })?;
                }
                debug!(target = %target.display(), backup = %backup_path.display(), "backed up");
                LinkResult::BackedUp { backup_path }
            } else {
                if !self.options.dry_run {
                    remove_path(target)?;
                }
                LinkResult::Replaced
            }
        } else if mapping.target_is_symlink {
            if !self.options.dry_run {
                remove_path(target)?;
            }
            LinkResult::Relinked
        } else {
            LinkResult::Created
        };

        self.create_symlink(&mapping.source_absolute, target)?;

        Ok(outcome)
    }

    fn create_symlink(&self, source: &Path, target: &Path) -> Result<(), LinkError> {
        if self.options.dry_run {
            return Ok(());
        }

        // Ensure parent directory exists
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| LinkError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let link = self.link_text(source, target);

        unix_fs::symlink(&link, target).map_err(|source| LinkError::LinkCreation {
            target: target.to_path_buf(),
            link: link.clone(),
            source,
        })?;

        debug!(target = %target.display(), link = %link.display(), "linked");
        Ok(())
    }

    /// What gets written into the symlink at `target`.
    ///
    /// Relative text is computed from the real directory of `target`, so a
    /// symlinked `~/.config` still resolves. In a dry run the parent may not
    /// exist yet and the text falls back to a purely lexical path.
    pub fn link_text(&self, source: &Path, target: &Path) -> PathBuf {
        if !self.options.relative {
            return normalize(source);
        }

        relative_to(source, &link_dir(target))
    }

    /// Remove `mapping`'s target only if it is a symlink back to its source.
    pub fn unlink(&self, mapping: &DotfileMapping) -> Result<LinkResult, LinkError> {
        let target = &mapping.target_absolute;

        if !mapping.target_exists {
            return Ok(LinkResult::Skipped {
                reason: "does not exist".to_string(),
            });
        }

        if !mapping.target_is_symlink {
            return Ok(LinkResult::Skipped {
                reason: "not a symlink".to_string(),
            });
        }

        let points_home = fs::read_link(target)
            .map(|text| resolve_link_text(target, &text) == normalize(&mapping.source_absolute))
            .unwrap_or(false);

        if !points_home {
            return Ok(LinkResult::Skipped {
                reason: "symlink points elsewhere".to_string(),
            });
        }

        if !self.options.dry_run {
            remove_path(target)?;
        }

        Ok(LinkResult::Unlinked)
    }
}

/// `<target>.bak.<YYYYMMDDHHMMSS>`, with a counter appended on collision.
pub fn backup_path(target: &Path) -> PathBuf {
    let stamp = Local::now().format(BACKUP_TIMESTAMP).to_string();
    let mut name = target.as_os_str().to_os_string();
    name.push(format!(".bak.{}", stamp));

    let candidate = PathBuf::from(&name);
    if fs::symlink_metadata(&candidate).is_err() {
        return candidate;
    }

    (1..)
        .map(|n| {
            let mut numbered = name.clone();
            numbered.push(format!(".{}", n));
            PathBuf::from(numbered)
        })
        .find(|p| fs::symlink_metadata(p).is_err())
        .unwrap_or(candidate)
}

/// Delete a file, symlink or directory tree. Already gone counts as removed.
fn remove_path(path: &Path) -> Result<(), LinkError> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LinkError::Removal {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn print_result(relative_path: &str, result: &LinkResult, verbose: bool) {
    match result {
        LinkResult::Created => {
            println!("  {} {}", "✓".green(), relative_path);
        }
        LinkResult::AlreadyCorrect => {
            if verbose {
                println!("  {} {} (unchanged)", "✓".green(), relative_path.dimmed());
            }
        }
        LinkResult::Relinked => {
            println!("  {} {} (relinked)", "✓".green(), relative_path);
        }
        LinkResult::Replaced => {
            println!("  {} {} (replaced existing)", "⚠".yellow(), relative_path);
        }
        LinkResult::BackedUp { backup_path } => {
            println!(
                "  {} {} (backup: {})",
                "⚠".yellow(),
                relative_path,
                backup_path.file_name().unwrap_or_default().to_string_lossy()
            );
        }
        LinkResult::Unlinked => {
            println!("  {} {} (removed)", "✓".green(), relative_path);
        }
        LinkResult::Skipped { reason } => {
            if verbose {
                println!("  {} {} ({})", "⊘".yellow(), relative_path, reason.dimmed());
            }
        }
    }
}

pub fn print_failure(relative_path: &str, error: &LinkError) {
    println!("  {} {} ({})", "✗".red(), relative_path, chain(error));
}
