//! Native package manager backends.
use std::fmt;
use std::str::FromStr;

use colored::Colorize;
use tracing::{debug, info};

use crate::catalog::NONE;
use crate::config::UserConfiguration;
use crate::error::PackageError;
use crate::exec::Runner;

/// Supported package managers, selected once by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Brew,
    Pacman,
    Dnf,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for PackageManager {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apt" | "apt-get" => Ok(Self::Apt),
            "brew" | "homebrew" => Ok(Self::Brew),
            "pacman" => Ok(Self::Pacman),
            "dnf" => Ok(Self::Dnf),
            other => Err(PackageError::UnknownBackend(other.to_string())),
        }
    }
}

/// Catalog ids whose package name differs per backend.
/// Columns: apt, brew, pacman, dnf. `None` means not packaged there.
const PACKAGE_NAMES: &[(&str, [Option<&str>; 4])] = &[
    ("fd", [Some("fd-find"), Some("fd"), Some("fd"), Some("fd-find")]),
    ("node", [Some("nodejs"), Some("node"), Some("nodejs"), Some("nodejs")]),
    ("python", [Some("python3"), Some("python"), Some("python"), Some("python3")]),
    ("go", [Some("golang"), Some("go"), Some("go"), Some("golang")]),
    ("rust", [Some("rustup"), Some("rustup"), Some("rustup"), Some("rustup")]),
    (
        "java",
        [
            Some("default-jdk"),
            Some("openjdk"),
            Some("jdk-openjdk"),
            Some("java-latest-openjdk"),
        ],
    ),
    ("vscode", [Some("code"), Some("visual-studio-code"), Some("code"), Some("code")]),
    ("pure", [None, Some("pure"), None, None]),
    ("oh-my-posh", [None, Some("oh-my-posh"), None, None]),
    ("eza", [Some("eza"), Some("eza"), Some("eza"), None]),
    ("lazygit", [None, Some("lazygit"), Some("lazygit"), None]),
];

impl PackageManager {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Brew => "brew",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
        }
    }

    /// Executable probed on PATH to detect this backend.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Brew => "brew",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
        }
    }

    fn column(&self) -> usize {
        match self {
            Self::Apt => 0,
            Self::Brew => 1,
            Self::Pacman => 2,
            Self::Dnf => 3,
        }
    }

    /// Backend package name for a catalog id, or `None` if it is not packaged.
    pub fn package_name(&self, id: &str) -> Option<String> {
        match PACKAGE_NAMES.iter().find(|(known, _)| *known == id) {
            Some((_, names)) => names[self.column()].map(str::to_string),
            None => Some(id.to_string()),
        }
    }

    fn install_command<'a>(&self, name: &'a str) -> (&'static str, Vec<&'a str>) {
        match self {
            Self::Apt => ("sudo", vec!["apt-get", "install", "-y", name]),
            Self::Brew => ("brew", vec!["install", name]),
            Self::Pacman => ("sudo", vec!["pacman", "-S", "--needed", "--noconfirm", name]),
            Self::Dnf => ("sudo", vec!["dnf", "install", "-y", name]),
        }
    }

    fn query_command<'a>(&self, name: &'a str) -> (&'static str, Vec<&'a str>) {
        match self {
            Self::Apt => ("dpkg", vec!["-s", name]),
            Self::Brew => ("brew", vec!["list", "--versions", name]),
            Self::Pacman => ("pacman", vec!["-Q", name]),
            Self::Dnf => ("rpm", vec!["-q", name]),
        }
    }

    fn update_command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Apt => ("sudo", vec!["apt-get", "update"]),
            Self::Brew => ("brew", vec!["update"]),
            Self::Pacman => ("sudo", vec!["pacman", "-Sy", "--noconfirm"]),
            Self::Dnf => ("sudo", vec!["dnf", "makecache"]),
        }
    }
}

#[derive(Debug, Default)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub already_present: Vec<String>,
    pub unavailable: Vec<String>,
}

/// Drives one backend through a [`Runner`].
pub struct Installer<'a> {
    manager: PackageManager,
    runner: &'a dyn Runner,
    /// Log commands instead of running them
    dry_run: bool,
}

impl<'a> Installer<'a> {
    pub fn new(manager: PackageManager, runner: &'a dyn Runner, dry_run: bool) -> Self {
        Self {
            manager,
            runner,
            dry_run,
        }
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    pub fn install(&self, name: &str) -> Result<(), PackageError> {
        let (program, args) = self.manager.install_command(name);
        if self.dry_run {
            info!("would run: {} {}", program, args.join(" "));
            return Ok(());
        }

        let result = self.spawn(program, &args)?;
        if result.success {
            Ok(())
        } else {
            Err(PackageError::Install {
                package: name.to_string(),
                manager: self.manager.to_string(),
                detail: result.detail(),
            })
        }
    }

    /// A query that cannot run counts as not installed.
    pub fn is_installed(&self, name: &str) -> bool {
        let (program, args) = self.manager.query_command(name);
        match self.runner.run(program, &args) {
            Ok(result) => result.success,
            Err(e) => {
                debug!("{} {} failed: {}", program, args.join(" "), e);
                false
            }
        }
    }

    pub fn update(&self) -> Result<(), PackageError> {
        let (program, args) = self.manager.update_command();
        if self.dry_run {
            info!("would run: {} {}", program, args.join(" "));
            return Ok(());
        }

        let result = self.spawn(program, &args)?;
        if result.success {
            Ok(())
        } else {
            Err(PackageError::Update {
                manager: self.manager.to_string(),
                detail: result.detail(),
            })
        }
    }

    /// Install catalog ids in order, stopping at the first failure.
    pub fn install_all(&self, ids: &[String]) -> Result<InstallSummary, PackageError> {
        let mut summary = InstallSummary::default();

        for id in ids {
            let Some(name) = self.manager.package_name(id) else {
                println!("  {} {} (not packaged for {})", "⊘".yellow(), id, self.manager);
                summary.unavailable.push(id.clone());
                continue;
            };

            if self.is_installed(&name) {
                debug!(package = %name, "already installed");
                summary.already_present.push(id.clone());
                continue;
            }

            if let Err(e) = self.install(&name) {
                println!("  {} {}", "✗".red(), id);
                return Err(e);
            }

            println!("  {} {}", "✓".green(), id);
            summary.installed.push(id.clone());
        }

        Ok(summary)
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<crate::exec::ExecResult, PackageError> {
        debug!("running: {} {}", program, args.join(" "));
        self.runner
            .run(program, args)
            .map_err(|source| PackageError::Spawn {
                program: program.to_string(),
                source,
            })
    }
}

/// Catalog ids to install for a configuration: shell, prompt, tools,
/// languages, then editors. Duplicates and `none` are dropped.
pub fn wanted_packages(config: &UserConfiguration) -> Vec<String> {
    let mut wanted: Vec<String> = Vec::new();

    let candidates = std::iter::once(config.shell.as_str().to_string())
        .chain(std::iter::once(config.prompt.clone()))
        .chain(config.cli_tools.iter().cloned())
        .chain(config.languages.iter().cloned())
        .chain(config.editors.iter().cloned());

    for id in candidates {
        if id != NONE && !wanted.contains(&id) {
            wanted.push(id);
        }
    }

    wanted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecResult;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::io;

    /// Records every command and fails the ones listed in `failing`.
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<String>>,
        installed: HashSet<String>,
        failing: HashSet<String>,
    }

    impl Runner for FakeRunner {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecResult> {
            let line = format!("{} {}", program, args.join(" "));
            self.calls.borrow_mut().push(line);

            let name = args.last().copied().unwrap_or_default();
            let querying = matches!(program, "dpkg" | "rpm")
                || args.first().is_some_and(|a| *a == "-Q" || *a == "list");
            let success = if querying {
                self.installed.contains(name)
            } else {
                !self.failing.contains(name)
            };

            Ok(ExecResult {
                success,
                code: Some(if success { 0 } else { 1 }),
                stderr: if success { String::new() } else { "boom".to_string() },
                ..ExecResult::default()
            })
        }
    }

    #[test]
    fn parse_tags() {
        assert_eq!("apt".parse::<PackageManager>().unwrap(), PackageManager::Apt);
        assert_eq!("brew".parse::<PackageManager>().unwrap(), PackageManager::Brew);
        assert!(matches!(
            "zypper".parse::<PackageManager>(),
            Err(PackageError::UnknownBackend(_))
        ));
    }

    #[test]
    fn package_names_per_backend() {
        assert_eq!(PackageManager::Apt.package_name("fd").as_deref(), Some("fd-find"));
        assert_eq!(PackageManager::Pacman.package_name("fd").as_deref(), Some("fd"));
        assert_eq!(PackageManager::Apt.package_name("ripgrep").as_deref(), Some("ripgrep"));
        assert_eq!(PackageManager::Apt.package_name("pure"), None);
    }

    #[test]
    fn install_uses_backend_command() {
        let runner = FakeRunner::default();
        Installer::new(PackageManager::Pacman, &runner, false)
            .install("git")
            .unwrap();

        assert_eq!(
            runner.calls.borrow().as_slice(),
            ["sudo pacman -S --needed --noconfirm git"]
        );
    }

    #[test]
    fn install_failure_reports_package() {
        let runner = FakeRunner {
            failing: HashSet::from(["jq".to_string()]),
            ..FakeRunner::default()
        };
        let err = Installer::new(PackageManager::Brew, &runner, false)
            .install("jq")
            .unwrap_err();

        assert!(err.to_string().contains("jq"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn install_all_skips_installed_and_stops_at_failure() {
        let runner = FakeRunner {
            installed: HashSet::from(["git".to_string()]),
            failing: HashSet::from(["bat".to_string()]),
            ..FakeRunner::default()
        };
        let installer = Installer::new(PackageManager::Brew, &runner, false);
        let ids: Vec<String> = ["git", "fzf", "bat", "jq"].iter().map(|s| s.to_string()).collect();

        let err = installer.install_all(&ids).unwrap_err();

        assert!(matches!(err, PackageError::Install { ref package, .. } if package == "bat"));
        let calls = runner.calls.borrow();
        assert!(calls.contains(&"brew install fzf".to_string()));
        assert!(!calls.iter().any(|c| c.contains("jq")));
        assert!(!calls.contains(&"brew install git".to_string()));
    }

    #[test]
    fn install_all_records_unavailable() {
        let runner = FakeRunner::default();
        let installer = Installer::new(PackageManager::Apt, &runner, false);

        let summary = installer
            .install_all(&["pure".to_string(), "tmux".to_string()])
            .unwrap();

        assert_eq!(summary.unavailable, vec!["pure"]);
        assert_eq!(summary.installed, vec!["tmux"]);
    }

    #[test]
    fn dry_run_only_queries() {
        let runner = FakeRunner::default();
        let installer = Installer::new(PackageManager::Dnf, &runner, true);

        installer.update().unwrap();
        installer.install_all(&["htop".to_string()]).unwrap();

        assert_eq!(runner.calls.borrow().as_slice(), ["rpm -q htop"]);
    }

    #[test]
    fn wanted_packages_order_and_dedup() {
        let config = UserConfiguration {
            prompt: "starship".to_string(),
            cli_tools: vec!["git".to_string(), "fzf".to_string()],
            languages: vec!["go".to_string()],
            editors: vec!["neovim".to_string(), "git".to_string()],
            ..UserConfiguration::default()
        };

        assert_eq!(
            wanted_packages(&config),
            vec!["zsh", "starship", "git", "fzf", "go", "neovim"]
        );
    }
}
