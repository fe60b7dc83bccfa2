//! Read-only lookup tables shared by the wizard, the package installer and
//! the dotfile resolver.

use crate::shell::Shell;

/// A selectable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub id: &'static str,
    pub description: &'static str,
}

const fn item(id: &'static str, description: &'static str) -> Item {
    Item { id, description }
}

pub const NONE: &str = "none";

const NO_PLUGIN_MANAGER: Item = item(NONE, "Do not install a plugin manager");

const PLUGIN_MANAGERS: &[(Shell, Item)] = &[
    (Shell::Zsh, item("oh-my-zsh", "Community-driven zsh framework")),
    (Shell::Zsh, item("zinit", "Fast, flexible zsh plugin manager")),
    (Shell::Zsh, item("antidote", "Static zsh plugin loader")),
    (Shell::Bash, item("oh-my-bash", "Framework for bash configuration")),
    (Shell::Bash, item("bash-it", "Collection of bash commands and scripts")),
    (Shell::Fish, item("fisher", "Plugin manager for fish")),
    (Shell::Fish, item("oh-my-fish", "Fish shell framework")),
];

pub const PROMPTS: &[Item] = &[
    item("starship", "Minimal, fast prompt for any shell"),
    item("oh-my-posh", "Prompt theme engine"),
    item("pure", "Pretty, minimal and fast prompt"),
    item(NONE, "Keep the shell's default prompt"),
];

pub const CLI_TOOLS: &[Item] = &[
    item("git", "Version control"),
    item("fzf", "Fuzzy finder"),
    item("ripgrep", "Recursive search"),
    item("fd", "Fast find alternative"),
    item("bat", "cat with syntax highlighting"),
    item("eza", "Modern ls"),
    item("zoxide", "Smarter cd"),
    item("jq", "JSON processor"),
    item("tmux", "Terminal multiplexer"),
    item("lazygit", "Terminal UI for git"),
    item("htop", "Process viewer"),
    item("direnv", "Per-directory environments"),
];

pub const LANGUAGES: &[Item] = &[
    item("go", "Go toolchain"),
    item("rust", "Rust via rustup"),
    item("node", "Node.js runtime"),
    item("python", "Python 3"),
    item("ruby", "Ruby"),
    item("java", "OpenJDK"),
    item("lua", "Lua interpreter"),
    item("zig", "Zig compiler"),
];

pub const EDITORS: &[Item] = &[
    item("neovim", "Hyperextensible Vim-based editor"),
    item("vim", "Vi improved"),
    item("helix", "Post-modern modal editor"),
    item("emacs", "Extensible editor"),
    item("vscode", "Visual Studio Code"),
];

pub const DEFAULT_DOTFILES_PATH: &str = "~/.dotfiles";

/// How a language gets its package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerRule {
    /// The language has no package manager to record.
    Absent,
    /// Always this manager.
    Fixed(&'static str),
    /// The user picks one; the first entry is the default.
    Choice(&'static [&'static str]),
}

const MANAGER_RULES: &[(&str, ManagerRule)] = &[
    ("go", ManagerRule::Absent),
    ("rust", ManagerRule::Fixed("cargo")),
    ("node", ManagerRule::Choice(&["npm", "pnpm", "yarn", "bun"])),
    ("python", ManagerRule::Choice(&["pip", "uv", "poetry"])),
    ("ruby", ManagerRule::Fixed("gem")),
    ("java", ManagerRule::Choice(&["gradle", "maven"])),
    ("lua", ManagerRule::Fixed("luarocks")),
    ("zig", ManagerRule::Absent),
];

/// Plugin managers applicable to `shell`, followed by the universal `none`.
pub fn plugin_managers_for(shell: Shell) -> Vec<Item> {
    PLUGIN_MANAGERS
        .iter()
        .filter(|(s, _)| *s == shell)
        .map(|(_, item)| *item)
        .chain(std::iter::once(NO_PLUGIN_MANAGER))
        .collect()
}

pub fn is_plugin_manager_for(shell: Shell, id: &str) -> bool {
    plugin_managers_for(shell).iter().any(|item| item.id == id)
}

pub fn manager_rule(language: &str) -> ManagerRule {
    MANAGER_RULES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, rule)| *rule)
        .unwrap_or(ManagerRule::Absent)
}

/// Every manager that may be recorded for `language`.
pub fn valid_managers(language: &str) -> Vec<&'static str> {
    match manager_rule(language) {
        ManagerRule::Absent => Vec::new(),
        ManagerRule::Fixed(manager) => vec![manager],
        ManagerRule::Choice(managers) => managers.to_vec(),
    }
}

pub fn is_known(items: &[Item], id: &str) -> bool {
    items.iter().any(|item| item.id == id)
}

/// A dotfile whose repository name does not mirror its home location.
#[derive(Debug, Clone, Copy)]
pub struct Alias {
    /// Path relative to the dotfiles root.
    pub source: &'static str,
    /// Path relative to the home directory.
    pub target: &'static str,
}

const fn alias(source: &'static str, target: &'static str) -> Alias {
    Alias { source, target }
}

pub const DOTFILE_ALIASES: &[Alias] = &[
    alias(".zshrc", ".zshrc"),
    alias(".zshenv", ".zshenv"),
    alias(".bashrc", ".bashrc"),
    alias(".bash_profile", ".bash_profile"),
    alias(".gitconfig", ".gitconfig"),
    alias("zshrc", ".zshrc"),
    alias("bashrc", ".bashrc"),
    alias("gitconfig", ".gitconfig"),
    alias("tmux.conf", ".tmux.conf"),
    alias("wezterm.lua", ".wezterm.lua"),
    alias("config.fish", ".config/fish/config.fish"),
    alias("starship.toml", ".config/starship.toml"),
    alias("nvim", ".config/nvim"),
    alias("helix", ".config/helix"),
    alias("alacritty", ".config/alacritty"),
    alias("kitty", ".config/kitty"),
    alias("lazygit", ".config/lazygit"),
];

pub fn alias_target(relative: &str) -> Option<&'static str> {
    DOTFILE_ALIASES
        .iter()
        .find(|a| a.source == relative)
        .map(|a| a.target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_managers_filtered_by_shell() {
        let ids: Vec<&str> = plugin_managers_for(Shell::Fish).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["fisher", "oh-my-fish", "none"]);
        assert!(!is_plugin_manager_for(Shell::Bash, "zinit"));
        assert!(is_plugin_manager_for(Shell::Bash, NONE));
    }

    #[test]
    fn test_manager_rules() {
        assert_eq!(manager_rule("rust"), ManagerRule::Fixed("cargo"));
        assert_eq!(manager_rule("go"), ManagerRule::Absent);
        assert_eq!(manager_rule("cobol"), ManagerRule::Absent);
        assert_eq!(valid_managers("rust"), vec!["cargo"]);
        assert!(valid_managers("go").is_empty());
        assert!(valid_managers("node").contains(&"pnpm"));
    }

    #[test]
    fn test_every_language_has_a_rule() {
        for lang in LANGUAGES {
            assert!(MANAGER_RULES.iter().any(|(l, _)| *l == lang.id), "{}", lang.id);
        }
    }

    #[test]
    fn test_alias_lookup() {
        assert_eq!(alias_target("nvim"), Some(".config/nvim"));
        assert_eq!(alias_target("starship.toml"), Some(".config/starship.toml"));
        assert_eq!(alias_target("nvim/init.lua"), None);
    }
}
