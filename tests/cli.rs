use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Env {
    temp: TempDir,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("home")).unwrap();
        fs::create_dir_all(temp.path().join("repo")).unwrap();
        Self { temp }
    }

    fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    fn repo(&self) -> PathBuf {
        self.temp.path().join("repo")
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.yaml")
    }

    fn write_config(&self, dev_mode: bool) {
        let yaml = format!(
            "shell: zsh
plugin_manager: none
prompt: none
cli_tools: []
languages: []
package_managers: {{}}
dotfiles_path: {}
use_relative_links: false
backup_existing: true
editors: []
dev_mode: {}
",
            self.repo().display(),
            dev_mode
        );
        fs::write(self.config_path(), yaml).unwrap();
    }

    fn add_dotfile(&self, relative: &str, content: &str) {
        let path = self.repo().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn rigup(&self) -> Command {
        let mut cmd = Command::cargo_bin("rigup").unwrap();
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.temp.path().join("xdg"))
            .env_remove("RIGUP_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

fn link_target(path: &Path) -> PathBuf {
    fs::read_link(path).unwrap()
}

#[test]
fn test_missing_config_fails() {
    let env = Env::new();

    env.rigup()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rigup init"));
}

#[test]
fn test_show_prints_summary() {
    let env = Env::new();
    env.write_config(false);

    env.rigup()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell"))
        .stdout(predicate::str::contains("zsh"));
}

#[test]
fn test_link_creates_symlinks() {
    let env = Env::new();
    env.write_config(false);
    env.add_dotfile(".zshrc", "zsh");
    env.add_dotfile(".config/nvim/init.lua", "lua");
    env.add_dotfile(".git/config", "git");

    env.rigup().arg("link").assert().success();

    assert_eq!(link_target(&env.home().join(".zshrc")), env.repo().join(".zshrc"));
    assert_eq!(
        link_target(&env.home().join(".config/nvim/init.lua")),
        env.repo().join(".config/nvim/init.lua")
    );
    assert!(!env.home().join(".git").exists());

    // Second run changes nothing
    env.rigup()
        .arg("link")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 changed"));
}

#[test]
fn test_dry_run_leaves_home_untouched() {
    let env = Env::new();
    env.write_config(false);
    env.add_dotfile(".zshrc", "zsh");

    env.rigup()
        .args(["link", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(fs::symlink_metadata(env.home().join(".zshrc")).is_err());
}

#[test]
fn test_status_reports_missing_then_linked() {
    let env = Env::new();
    env.write_config(false);
    env.add_dotfile(".zshrc", "zsh");

    env.rigup()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"));

    env.rigup().arg("link").assert().success();

    env.rigup()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing").not());
}

#[test]
fn test_unlink_removes_own_links() {
    let env = Env::new();
    env.write_config(false);
    env.add_dotfile(".zshrc", "zsh");

    env.rigup().arg("link").assert().success();
    env.rigup().arg("unlink").assert().success();

    assert!(fs::symlink_metadata(env.home().join(".zshrc")).is_err());
}

#[test]
fn test_dev_mode_up_only_logs_packages() {
    let env = Env::new();
    env.write_config(true);
    env.add_dotfile(".zshrc", "zsh");

    env.rigup()
        .args(["apply", "--package-manager", "apt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would run"));

    assert!(fs::symlink_metadata(env.home().join(".zshrc")).is_ok());
}

#[test]
fn test_up_links_even_when_install_fails() {
    let env = Env::new();
    env.write_config(false);
    env.add_dotfile(".zshrc", "zsh");

    env.rigup()
        .env("PATH", env.temp.path().join("no-bin"))
        .args(["up", "--package-manager", "brew"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to run brew"));

    assert_eq!(link_target(&env.home().join(".zshrc")), env.repo().join(".zshrc"));
}

#[test]
fn test_unknown_package_manager_rejected() {
    let env = Env::new();
    env.write_config(false);

    env.rigup()
        .args(["install", "--package-manager", "zypper"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zypper"));
}
