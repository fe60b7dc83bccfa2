use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    #[default]
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Zsh, Shell::Bash, Shell::Fish];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Fish => "fish",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Shell::Zsh => "Z shell, extensible with plugin frameworks",
            Shell::Bash => "GNU Bourne-Again shell",
            Shell::Fish => "Friendly interactive shell",
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Shell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shell::ALL
            .into_iter()
            .find(|shell| shell.as_str() == s)
            .ok_or_else(|| format!("unknown shell: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert_eq!("fish".parse::<Shell>().unwrap(), Shell::Fish);
        assert!("tcsh".parse::<Shell>().is_err());
    }

    #[test]
    fn test_shell_yaml_is_lowercase() {
        let yaml = serde_yaml::to_string(&Shell::Bash).unwrap();
        assert_eq!(yaml.trim(), "bash");
    }
}
