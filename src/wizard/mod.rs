//! The configuration wizard as a pure state machine.
//!
//! Feed it [`Input`]s with [`Wizard::handle`] and draw [`Wizard::view`]
//! between inputs. Nothing here touches the terminal.

pub mod select;
pub mod view;

use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::{self, ManagerRule};
use crate::config::UserConfiguration;
use crate::shell::Shell;
use select::{options_from, ChoiceOption, MultiSelect, SingleSelect, TextInput};
use view::{Body, Toggle, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Shell,
    PluginManager,
    Prompt,
    CliTools,
    Languages,
    PackageManagers,
    Editors,
    DotfilesPath,
    Options,
    Confirm,
    Done,
}

impl Step {
    const INTERACTIVE: [Step; 10] = [
        Step::Shell,
        Step::PluginManager,
        Step::Prompt,
        Step::CliTools,
        Step::Languages,
        Step::PackageManagers,
        Step::Editors,
        Step::DotfilesPath,
        Step::Options,
        Step::Confirm,
    ];

    fn number(&self) -> usize {
        Self::INTERACTIVE
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(Self::INTERACTIVE.len())
    }
}

/// A discrete user input, already decoded from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Finished(UserConfiguration),
    Cancelled,
}

/// Per-language package manager question.
#[derive(Debug, Clone)]
struct ManagerPrompt {
    language: String,
    select: SingleSelect,
}

#[derive(Debug, Clone, Copy)]
struct Toggles {
    relative: bool,
    backup: bool,
    dev_mode: bool,
}

pub struct Wizard {
    step: Step,
    shell: SingleSelect,
    plugin_manager: SingleSelect,
    prompt: SingleSelect,
    cli_tools: MultiSelect,
    languages: MultiSelect,
    manager_prompts: Vec<ManagerPrompt>,
    manager_index: usize,
    editors: MultiSelect,
    dotfiles_path: TextInput,
    toggles: Toggles,
    /// Answers committed so far
    config: UserConfiguration,
    platform: Option<String>,
}

impl Wizard {
    pub fn new() -> Self {
        let config = UserConfiguration::default();
        let shells = Shell::ALL
            .iter()
            .map(|s| ChoiceOption::new(s.as_str(), s.description()))
            .collect();

        Self {
            step: Step::Shell,
            shell: SingleSelect::new(shells),
            plugin_manager: SingleSelect::new(options_from(&catalog::plugin_managers_for(
                config.shell,
            ))),
            prompt: SingleSelect::new(options_from(catalog::PROMPTS)),
            cli_tools: MultiSelect::new(options_from(catalog::CLI_TOOLS)),
            languages: MultiSelect::new(options_from(catalog::LANGUAGES)),
            manager_prompts: Vec::new(),
            manager_index: 0,
            editors: MultiSelect::new(options_from(catalog::EDITORS)),
            dotfiles_path: TextInput::new(catalog::DEFAULT_DOTFILES_PATH),
            toggles: Toggles {
                relative: config.use_relative_links,
                backup: config.backup_existing,
                dev_mode: config.dev_mode,
            },
            config,
            platform: None,
        }
    }

    /// Start with the answers of an existing configuration highlighted.
    pub fn with_defaults(existing: &UserConfiguration) -> Self {
        let mut wizard = Self::new();

        wizard.shell.select_id(existing.shell.as_str());
        wizard.plugin_manager.set_options(options_from(&catalog::plugin_managers_for(
            existing.shell,
        )));
        wizard.plugin_manager.select_id(&existing.plugin_manager);
        wizard.prompt.select_id(&existing.prompt);
        wizard.cli_tools.set_checked(&existing.cli_tools);
        wizard.languages.set_checked(&existing.languages);
        wizard.editors.set_checked(&existing.editors);
        wizard.dotfiles_path.set_value(&existing.dotfiles_path);
        wizard.toggles = Toggles {
            relative: existing.use_relative_links,
            backup: existing.backup_existing,
            dev_mode: existing.dev_mode,
        };
        wizard.manager_prompts = manager_prompts(&existing.languages, &[], &existing.package_managers);
        wizard.config = existing.clone();

        wizard
    }

    /// Text describing the detected platform, shown in the header.
    pub fn set_platform(&mut self, platform: impl Into<String>) {
        self.platform = Some(platform.into());
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    #[cfg(test)]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Process one input. The state is fully updated before returning.
    pub fn handle(&mut self, input: Input) -> Status {
        let status = match self.step {
            Step::Shell => self.handle_shell(input),
            Step::PluginManager => self.handle_single(input, Step::Shell),
            Step::Prompt => self.handle_single(input, Step::PluginManager),
            Step::CliTools => self.handle_multi(input, Step::Prompt),
            Step::Languages => self.handle_multi(input, Step::CliTools),
            Step::PackageManagers => self.handle_package_managers(input),
            Step::Editors => self.handle_multi(input, Step::Languages),
            Step::DotfilesPath => self.handle_dotfiles_path(input),
            Step::Options => self.handle_options(input),
            Step::Confirm => self.handle_confirm(input),
            Step::Done => Status::Finished(self.config.clone()),
        };

        debug!(step = ?self.step, ?input, "wizard input");
        status
    }

    fn handle_shell(&mut self, input: Input) -> Status {
        match input {
            Input::Up => self.shell.previous(),
            Input::Down => self.shell.next(),
            Input::Back => return Status::Cancelled,
            Input::Enter => self.commit_shell(),
            _ => {}
        }
        Status::Running
    }

    fn commit_shell(&mut self) {
        let Some(shell) = self.shell.selected_id().and_then(|id| id.parse::<Shell>().ok()) else {
            return;
        };

        self.config.shell = shell;
        self.plugin_manager
            .set_options(options_from(&catalog::plugin_managers_for(shell)));
        self.step = Step::PluginManager;
    }

    fn handle_single(&mut self, input: Input, previous: Step) -> Status {
        let select = match self.step {
            Step::PluginManager => &mut self.plugin_manager,
            _ => &mut self.prompt,
        };

        match input {
            Input::Up => select.previous(),
            Input::Down => select.next(),
            Input::Back => self.step = previous,
            Input::Enter => {
                let Some(id) = select.selected_id() else {
                    return Status::Running;
                };
                if self.step == Step::PluginManager {
                    self.config.plugin_manager = id;
                    self.step = Step::Prompt;
                } else {
                    self.config.prompt = id;
                    self.step = Step::CliTools;
                }
            }
            _ => {}
        }
        Status::Running
    }

    fn handle_multi(&mut self, input: Input, previous: Step) -> Status {
        let select = match self.step {
            Step::CliTools => &mut self.cli_tools,
            Step::Languages => &mut self.languages,
            _ => &mut self.editors,
        };

        match input {
            Input::Up => select.previous(),
            Input::Down => select.next(),
            Input::Char(' ') => select.toggle(),
            Input::Back => self.back_from_multi(previous),
            Input::Enter => {
                let ids = select.selected_ids();
                match self.step {
                    Step::CliTools => {
                        self.config.cli_tools = ids;
                        self.step = Step::Languages;
                    }
                    Step::Languages => self.commit_languages(ids),
                    _ => {
                        self.config.editors = ids;
                        self.step = Step::DotfilesPath;
                    }
                }
            }
            _ => {}
        }
        Status::Running
    }

    fn back_from_multi(&mut self, previous: Step) {
        if self.step == Step::Editors && !self.manager_prompts.is_empty() {
            self.manager_index = self.manager_prompts.len() - 1;
            self.step = Step::PackageManagers;
        } else {
            self.step = previous;
        }
    }

    fn commit_languages(&mut self, languages: Vec<String>) {
        self.manager_prompts = manager_prompts(
            &languages,
            &self.manager_prompts,
            &self.config.package_managers,
        );
        self.config.package_managers = fixed_package_managers(&languages);
        self.config.languages = languages;
        self.manager_index = 0;

        self.step = if self.manager_prompts.is_empty() {
            Step::Editors
        } else {
            Step::PackageManagers
        };
    }

    fn handle_package_managers(&mut self, input: Input) -> Status {
        let Some(prompt) = self.manager_prompts.get_mut(self.manager_index) else {
            self.step = Step::Editors;
            return Status::Running;
        };

        match input {
            Input::Up => prompt.select.previous(),
            Input::Down => prompt.select.next(),
            Input::Back => {
                if self.manager_index == 0 {
                    self.step = Step::Languages;
                } else {
                    self.manager_index -= 1;
                }
            }
            Input::Enter => {
                if let Some(manager) = prompt.select.selected_id() {
                    self.config
                        .package_managers
                        .insert(prompt.language.clone(), manager);
                }
                self.manager_index += 1;
                if self.manager_index >= self.manager_prompts.len() {
                    self.step = Step::Editors;
                }
            }
            _ => {}
        }
        Status::Running
    }

    fn handle_dotfiles_path(&mut self, input: Input) -> Status {
        match input {
            Input::Char(c) => self.dotfiles_path.insert_char(c),
            Input::Backspace => self.dotfiles_path.delete_char(),
            Input::Left => self.dotfiles_path.move_cursor_left(),
            Input::Right => self.dotfiles_path.move_cursor_right(),
            Input::Back => self.step = Step::Editors,
            Input::Enter => {
                self.config.dotfiles_path = self.dotfiles_path.committed();
                self.step = Step::Options;
            }
            _ => {}
        }
        Status::Running
    }

    fn handle_options(&mut self, input: Input) -> Status {
        match input {
            Input::Char('r') => self.toggles.relative = !self.toggles.relative,
            Input::Char('b') => self.toggles.backup = !self.toggles.backup,
            Input::Char('d') => self.toggles.dev_mode = !self.toggles.dev_mode,
            Input::Back => self.step = Step::DotfilesPath,
            Input::Enter => {
                self.config.use_relative_links = self.toggles.relative;
                self.config.backup_existing = self.toggles.backup;
                self.config.dev_mode = self.toggles.dev_mode;
                self.step = Step::Confirm;
            }
            _ => {}
        }
        Status::Running
    }

    fn handle_confirm(&mut self, input: Input) -> Status {
        match input {
            Input::Enter | Input::Char('y') | Input::Char('Y') => {
                self.step = Step::Done;
                return Status::Finished(self.config.clone());
            }
            Input::Char('n') | Input::Char('N') => self.restart(),
            Input::Back => self.step = Step::Options,
            _ => {}
        }
        Status::Running
    }

    /// Drop every answer and go back to the first step.
    fn restart(&mut self) {
        let platform = self.platform.take();
        *self = Self::new();
        self.platform = platform;
    }

    pub fn view(&self) -> View {
        let (title, question, body, help) = match self.step {
            Step::Shell => (
                "Shell".to_string(),
                "Which shell do you use?".to_string(),
                single_body(&self.shell),
                view::HELP_SINGLE,
            ),
            Step::PluginManager => (
                "Plugin manager".to_string(),
                format!("Plugin manager for {}", self.config.shell),
                single_body(&self.plugin_manager),
                view::HELP_SINGLE,
            ),
            Step::Prompt => (
                "Prompt".to_string(),
                "Which prompt should be installed?".to_string(),
                single_body(&self.prompt),
                view::HELP_SINGLE,
            ),
            Step::CliTools => (
                "CLI tools".to_string(),
                "Select command-line tools to install".to_string(),
                multi_body(&self.cli_tools),
                view::HELP_MULTI,
            ),
            Step::Languages => (
                "Languages".to_string(),
                "Select language toolchains".to_string(),
                multi_body(&self.languages),
                view::HELP_MULTI,
            ),
            Step::PackageManagers => match self.manager_prompts.get(self.manager_index) {
                Some(prompt) => (
                    "Package managers".to_string(),
                    format!(
                        "Package manager for {} ({}/{})",
                        prompt.language,
                        self.manager_index + 1,
                        self.manager_prompts.len()
                    ),
                    single_body(&prompt.select),
                    view::HELP_SINGLE,
                ),
                None => (
                    "Package managers".to_string(),
                    "Nothing to choose".to_string(),
                    Body::Done,
                    view::HELP_SINGLE,
                ),
            },
            Step::Editors => (
                "Editors".to_string(),
                "Select editors".to_string(),
                multi_body(&self.editors),
                view::HELP_MULTI,
            ),
            Step::DotfilesPath => (
                "Dotfiles".to_string(),
                "Where is your dotfiles repository?".to_string(),
                Body::Text {
                    value: self.dotfiles_path.value().to_string(),
                    cursor: self.dotfiles_path.cursor(),
                    placeholder: self.dotfiles_path.default_value().to_string(),
                },
                view::HELP_TEXT,
            ),
            Step::Options => (
                "Options".to_string(),
                "How should dotfiles be linked?".to_string(),
                Body::Toggles(vec![
                    Toggle {
                        key: 'r',
                        label: "Use relative symlinks",
                        enabled: self.toggles.relative,
                    },
                    Toggle {
                        key: 'b',
                        label: "Back up existing files",
                        enabled: self.toggles.backup,
                    },
                    Toggle {
                        key: 'd',
                        label: "Dev mode (log package commands, do not run them)",
                        enabled: self.toggles.dev_mode,
                    },
                ]),
                view::HELP_TOGGLES,
            ),
            Step::Confirm => (
                "Confirm".to_string(),
                "Save this configuration?".to_string(),
                Body::Summary(self.config.summary()),
                view::HELP_CONFIRM,
            ),
            Step::Done => (
                "Done".to_string(),
                "Configuration complete".to_string(),
                Body::Done,
                "",
            ),
        };

        View {
            title,
            question,
            step_number: self.step.number(),
            step_count: Step::INTERACTIVE.len(),
            body,
            help,
        }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

fn single_body(select: &SingleSelect) -> Body {
    Body::Single {
        options: select.options().to_vec(),
        cursor: select.cursor(),
    }
}

fn multi_body(select: &MultiSelect) -> Body {
    Body::Multi {
        options: select.options().to_vec(),
        checked: select.checked().to_vec(),
        cursor: select.cursor(),
    }
}

/// Managers assigned without asking: fixed ones only.
pub fn fixed_package_managers(languages: &[String]) -> BTreeMap<String, String> {
    languages
        .iter()
        .filter_map(|lang| match catalog::manager_rule(lang) {
            ManagerRule::Fixed(manager) => Some((lang.clone(), manager.to_string())),
            _ => None,
        })
        .collect()
}

/// One question per language with a genuine choice. Earlier prompts keep
/// their cursor; otherwise a previously saved answer is highlighted.
fn manager_prompts(
    languages: &[String],
    existing: &[ManagerPrompt],
    saved: &BTreeMap<String, String>,
) -> Vec<ManagerPrompt> {
    languages
        .iter()
        .filter_map(|lang| {
            let ManagerRule::Choice(managers) = catalog::manager_rule(lang) else {
                return None;
            };

            if let Some(prompt) = existing.iter().find(|p| &p.language == lang) {
                return Some(prompt.clone());
            }

            let options = managers
                .iter()
                .map(|m| ChoiceOption::new(*m, format!("{} packages via {}", lang, m)))
                .collect();
            let mut select = SingleSelect::new(options);
            if let Some(answer) = saved.get(lang) {
                select.select_id(answer);
            }

            Some(ManagerPrompt {
                language: lang.clone(),
                select,
            })
        })
        .collect()
}
