use std::fmt;

use crate::packages::PackageManager;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::MacOs => write!(f, "macos"),
            Os::Other => write!(f, "{}", std::env::consts::OS),
        }
    }
}

/// What the host can do, probed once before the wizard starts.
#[derive(Debug, Clone)]
pub struct Platform {
    pub os: Os,
    pub package_manager: Option<PackageManager>,
}

impl Platform {
    pub fn detect() -> Self {
        let os = Self::detect_os();
        Self {
            os,
            package_manager: Self::detect_package_manager(os),
        }
    }

    #[cfg(test)]
    pub fn new(os: Os, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            package_manager,
        }
    }

    pub fn describe(&self) -> String {
        match self.package_manager {
            Some(manager) => format!("{} ({})", self.os, manager),
            None => format!("{} (no supported package manager)", self.os),
        }
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            Os::Other
        }
    }

    fn detect_package_manager(os: Os) -> Option<PackageManager> {
        let candidates: &[PackageManager] = match os {
            Os::MacOs => &[PackageManager::Brew],
            Os::Linux => &[
                PackageManager::Apt,
                PackageManager::Pacman,
                PackageManager::Dnf,
                PackageManager::Brew,
            ],
            Os::Other => &[PackageManager::Brew],
        };

        candidates
            .iter()
            .copied()
            .find(|manager| which::which(manager.program()).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_mentions_manager() {
        let platform = Platform::new(Os::Linux, Some(PackageManager::Pacman));
        assert_eq!(platform.describe(), "linux (pacman)");

        let bare = Platform::new(Os::MacOs, None);
        assert_eq!(bare.describe(), "macos (no supported package manager)");
    }

    #[test]
    fn detect_matches_build_target() {
        let platform = Platform::detect();
        if cfg!(target_os = "linux") {
            assert_eq!(platform.os, Os::Linux);
        }
    }
}
