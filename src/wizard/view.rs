//! Render requests handed to the presentation layer.

use super::select::ChoiceOption;

/// Everything needed to draw the current step.
#[derive(Debug, Clone)]
pub struct View {
    pub title: String,
    pub question: String,
    /// 1-based position among the interactive steps
    pub step_number: usize,
    pub step_count: usize,
    pub body: Body,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub enum Body {
    Single {
        options: Vec<ChoiceOption>,
        cursor: usize,
    },
    Multi {
        options: Vec<ChoiceOption>,
        checked: Vec<bool>,
        cursor: usize,
    },
    Text {
        value: String,
        cursor: usize,
        placeholder: String,
    },
    Toggles(Vec<Toggle>),
    Summary(Vec<(&'static str, String)>),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub key: char,
    pub label: &'static str,
    pub enabled: bool,
}

pub const HELP_SINGLE: &str = "↑↓ Navigate • Enter Confirm • Esc Back";
pub const HELP_MULTI: &str = "↑↓ Navigate • Space Toggle • Enter Confirm • Esc Back";
pub const HELP_TEXT: &str = "Type a path • Enter Confirm (empty uses default) • Esc Back";
pub const HELP_TOGGLES: &str = "r/b/d Toggle • Enter Confirm • Esc Back";
pub const HELP_CONFIRM: &str = "y/Enter Save • n Start over • Esc Back";
