use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog;
use crate::config::UserConfiguration;
use crate::error::DiscoveryError;
use crate::paths::{absolute, normalize, resolve_link_text};

/// Root-level directory names mirrored under ~/.config
const CONFIG_PREFIXES: &[&str] = &[".config", "config"];

/// Never linked even though they look like dotfiles
const IGNORED_NAMES: &[&str] = &[".DS_Store", ".gitmodules", ".config"];

/// One source in the dotfiles repo and where it belongs in the home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfileMapping {
    pub source_relative: PathBuf,
    pub source_absolute: PathBuf,
    pub target_absolute: PathBuf,
    /// Directories are linked as a unit
    pub is_directory: bool,
    pub target_exists: bool,
    pub target_is_symlink: bool,
    pub needs_link: bool,
}

impl DotfileMapping {
    pub fn display_name(&self) -> String {
        self.source_relative.to_string_lossy().to_string()
    }
}

/// Resolve the configured dotfiles repo against `home`.
pub fn discover_for(
    config: &UserConfiguration,
    home: &Path,
) -> Result<Vec<DotfileMapping>, DiscoveryError> {
    let path = config.expanded_dotfiles_path();
    let cwd = std::env::current_dir().map_err(|source| DiscoveryError {
        path: path.clone(),
        source,
    })?;

    discover(&absolute(&path, &cwd), home)
}

/// Walk `root` depth-first and map every linkable path onto `home`.
pub fn discover(root: &Path, home: &Path) -> Result<Vec<DotfileMapping>, DiscoveryError> {
    let root = normalize(root);

    // Surface an unreadable root as an error rather than an empty walk
    fs::read_dir(&root).map_err(|source| DiscoveryError {
        path: root.clone(),
        source,
    })?;

    let real_root = fs::canonicalize(&root).map_err(|source| DiscoveryError {
        path: root.clone(),
        source,
    })?;

    let mut mappings = Vec::new();
    let mut claimed: Vec<PathBuf> = Vec::new();

    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop"));

                tolerate_vanished(path, source)?;
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let relative = relative.to_path_buf();
        let is_directory = entry.file_type().is_dir();

        if is_directory && is_pruned(&relative) {
            debug!(path = %relative.display(), "pruned hidden directory");
            walker.skip_current_dir();
            continue;
        }

        let Some(target_relative) = target_for(&relative, is_directory) else {
            if !is_directory {
                debug!(path = %relative.display(), "not mapped");
            }
            continue;
        };

        if is_directory {
            walker.skip_current_dir();
        }

        let target = home.join(target_relative);
        if claimed
            .iter()
            .any(|c| target.starts_with(c) || c.starts_with(&target))
        {
            warn!(
                path = %relative.display(),
                target = %target.display(),
                "target overlaps one claimed by an earlier entry"
            );
            continue;
        }

        if resolves_into(&target, &real_root) {
            warn!(
                path = %relative.display(),
                target = %target.display(),
                "target resolves into the dotfiles repo"
            );
            continue;
        }
        claimed.push(target.clone());

        let source = entry.path().to_path_buf();
        let (target_exists, target_is_symlink, needs_link) = inspect_target(&target, &source);

        mappings.push(DotfileMapping {
            source_relative: relative,
            source_absolute: source,
            target_absolute: target,
            is_directory,
            target_exists,
            target_is_symlink,
            needs_link,
        });
    }

    Ok(mappings)
}

/// A walk entry that disappeared after it was listed is skipped.
fn tolerate_vanished(path: PathBuf, source: io::Error) -> Result<(), DiscoveryError> {
    if source.kind() == io::ErrorKind::NotFound {
        debug!(path = %path.display(), "vanished during walk");
        return Ok(());
    }
    Err(DiscoveryError { path, source })
}

/// True when the directory holding `target` is, through symlinks, inside `real_root`.
fn resolves_into(target: &Path, real_root: &Path) -> bool {
    target
        .parent()
        .and_then(|parent| fs::canonicalize(parent).ok())
        .is_some_and(|parent| parent.starts_with(real_root))
}

fn is_pruned(relative: &Path) -> bool {
    let Some(name) = relative.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };

    if !name.starts_with('.') {
        return false;
    }

    // The root-level .config directory is the config prefix, not a hidden dir
    !(relative.components().count() == 1 && CONFIG_PREFIXES.iter().any(|p| *p == name))
}

/// Target path relative to the home directory, or `None` when unmapped.
fn target_for(relative: &Path, is_directory: bool) -> Option<PathBuf> {
    let relative_str = relative.to_string_lossy();

    if let Some(target) = catalog::alias_target(&relative_str) {
        return Some(PathBuf::from(target));
    }

    if is_directory {
        return None;
    }

    let mut components = relative.components();
    if let Some(Component::Normal(first)) = components.next() {
        let rest = components.as_path();
        let is_prefix = first.to_str().is_some_and(|f| CONFIG_PREFIXES.contains(&f));
        if is_prefix && !rest.as_os_str().is_empty() {
            return Some(Path::new(".config").join(rest));
        }
    }

    let name = relative.file_name()?.to_string_lossy();
    if name.starts_with('.') && !IGNORED_NAMES.iter().any(|n| *n == name) {
        return Some(PathBuf::from(name.into_owned()));
    }

    None
}

/// (exists, is_symlink, needs_link) for a target, without following links.
fn inspect_target(target: &Path, source: &Path) -> (bool, bool, bool) {
    let Ok(metadata) = fs::symlink_metadata(target) else {
        return (false, false, true);
    };

    if !metadata.file_type().is_symlink() {
        return (true, false, true);
    }

    let needs_link = match fs::read_link(target) {
        Ok(text) => resolve_link_text(target, &text) != normalize(source),
        Err(_) => true,
    };

    (true, true, needs_link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        repo: PathBuf,
        home: PathBuf,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("repo");
        let home = temp.path().join("home");
        fs::create_dir_all(&repo).unwrap();
        fs::create_dir_all(&home).unwrap();

        for file in files {
            let path = repo.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, *file).unwrap();
        }

        Fixture {
            _temp: temp,
            repo,
            home,
        }
    }

    fn relatives(mappings: &[DotfileMapping]) -> Vec<String> {
        mappings.iter().map(|m| m.display_name()).collect()
    }

    #[test]
    fn test_scenario_zshrc_nvim_git() {
        let f = fixture(&[".zshrc", ".config/nvim/init.lua", ".git/config"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(relatives(&mappings), vec![".config/nvim/init.lua", ".zshrc"]);
        assert_eq!(
            mappings[0].target_absolute,
            f.home.join(".config/nvim/init.lua")
        );
        assert_eq!(mappings[1].target_absolute, f.home.join(".zshrc"));
        assert!(mappings.iter().all(|m| m.needs_link && !m.target_exists));
    }

    #[test]
    fn test_hidden_directories_are_pruned() {
        let f = fixture(&[".git/HEAD", ".git/.hidden", ".cache/nvim/.vimrc", "zsh/.zshenv"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(relatives(&mappings), vec!["zsh/.zshenv"]);
    }

    #[test]
    fn test_hidden_file_in_subdirectory_is_flattened() {
        let f = fixture(&["git/.gitconfig"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(mappings[0].target_absolute, f.home.join(".gitconfig"));
    }

    #[test]
    fn test_alias_directory_is_linked_as_unit() {
        let f = fixture(&["nvim/init.lua", "nvim/lua/plugins.lua"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(mappings.len(), 1);
        assert!(mappings[0].is_directory);
        assert_eq!(mappings[0].target_absolute, f.home.join(".config/nvim"));
    }

    #[test]
    fn test_alias_file_wins_over_other_rules() {
        let f = fixture(&["starship.toml", "tmux.conf"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(mappings[0].target_absolute, f.home.join(".config/starship.toml"));
        assert_eq!(mappings[1].target_absolute, f.home.join(".tmux.conf"));
    }

    #[test]
    fn test_plain_config_prefix_is_mirrored() {
        let f = fixture(&["config/kitty/kitty.conf"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(
            mappings[0].target_absolute,
            f.home.join(".config/kitty/kitty.conf")
        );
    }

    #[test]
    fn test_unmapped_files_are_skipped() {
        let f = fixture(&["README.md", "scripts/setup.sh", ".DS_Store"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert!(mappings.is_empty());
    }

    #[test]
    fn test_empty_repo_is_not_an_error() {
        let f = fixture(&[]);
        assert!(discover(&f.repo, &f.home).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let f = fixture(&[]);
        let err = discover(&f.repo.join("missing"), &f.home).unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_targets_keep_first() {
        let f = fixture(&[".zshrc", "zshrc"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(relatives(&mappings), vec![".zshrc"]);
    }

    #[test]
    fn test_overlapping_targets_keep_first() {
        let f = fixture(&[".config/nvim/init.lua", "nvim/init.lua"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(relatives(&mappings), vec![".config/nvim/init.lua"]);
    }

    #[test]
    fn test_nested_target_after_directory_is_dropped() {
        let f = fixture(&["alacritty/alacritty.toml", "config/alacritty/alacritty.toml"]);

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert_eq!(relatives(&mappings), vec!["alacritty"]);
    }

    #[test]
    fn test_target_through_link_into_repo_is_refused() {
        let f = fixture(&[".config/nvim/init.lua", "nvim/init.lua"]);
        fs::create_dir_all(f.home.join(".config")).unwrap();
        symlink(f.repo.join("nvim"), f.home.join(".config/nvim")).unwrap();

        let mappings = discover(&f.repo, &f.home).unwrap();

        // Only the directory link itself survives, and it is already correct
        assert_eq!(relatives(&mappings), vec!["nvim"]);
        assert!(!mappings[0].needs_link);
    }

    #[test]
    fn test_unreadable_subdirectory_is_discovery_error() {
        use std::os::unix::fs::PermissionsExt;

        let f = fixture(&["locked/.zshrc"]);
        let locked = f.repo.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = discover(&f.repo, &f.home);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.path, locked);
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_vanished_entry_is_tolerated() {
        let path = PathBuf::from("/repo/gone");

        assert!(tolerate_vanished(path.clone(), io::ErrorKind::NotFound.into()).is_ok());

        let err = tolerate_vanished(path.clone(), io::ErrorKind::PermissionDenied.into()).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_existing_absolute_link_is_up_to_date() {
        let f = fixture(&[".zshrc"]);
        symlink(f.repo.join(".zshrc"), f.home.join(".zshrc")).unwrap();

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert!(mappings[0].target_exists);
        assert!(mappings[0].target_is_symlink);
        assert!(!mappings[0].needs_link);
    }

    #[test]
    fn test_existing_relative_link_is_up_to_date() {
        let f = fixture(&[".zshrc"]);
        symlink("../repo/.zshrc", f.home.join(".zshrc")).unwrap();

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert!(!mappings[0].needs_link);
    }

    #[test]
    fn test_link_elsewhere_needs_relink() {
        let f = fixture(&[".zshrc"]);
        symlink("/etc/zshrc", f.home.join(".zshrc")).unwrap();

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert!(mappings[0].target_is_symlink);
        assert!(mappings[0].needs_link);
    }

    #[test]
    fn test_regular_file_target_needs_link() {
        let f = fixture(&[".bashrc"]);
        fs::write(f.home.join(".bashrc"), "old").unwrap();

        let mappings = discover(&f.repo, &f.home).unwrap();

        assert!(mappings[0].target_exists);
        assert!(!mappings[0].target_is_symlink);
        assert!(mappings[0].needs_link);
    }

    #[test]
    fn test_relative_root_is_normalized() {
        let f = fixture(&[".zshrc"]);
        let dotted = f.repo.join("../repo");

        let mappings = discover(&dotted, &f.home).unwrap();

        assert_eq!(mappings[0].source_absolute, f.repo.join(".zshrc"));
    }
}
