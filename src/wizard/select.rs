//! Cursor and selection state for the individual wizard steps.

use crate::catalog::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub description: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl From<&Item> for ChoiceOption {
    fn from(item: &Item) -> Self {
        Self::new(item.id, item.description)
    }
}

pub fn options_from(items: &[Item]) -> Vec<ChoiceOption> {
    items.iter().map(ChoiceOption::from).collect()
}

/// One highlighted option out of a list.
#[derive(Debug, Clone)]
pub struct SingleSelect {
    options: Vec<ChoiceOption>,
    cursor: usize,
}

impl SingleSelect {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        Self { options, cursor: 0 }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Swap the option list; the cursor goes back to the first option.
    pub fn set_options(&mut self, options: Vec<ChoiceOption>) {
        self.options = options;
        self.cursor = 0;
    }

    /// Move the cursor onto `id` if it is one of the options.
    pub fn select_id(&mut self, id: &str) {
        if let Some(index) = self.options.iter().position(|o| o.id == id) {
            self.cursor = index;
        }
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.options.len();
    }

    pub fn previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.options.len() - 1
        } else {
            self.cursor - 1
        };
    }

    pub fn selected(&self) -> Option<&ChoiceOption> {
        self.options.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected().map(|o| o.id.clone())
    }
}

/// A cursor plus an independent checked flag per option.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    options: Vec<ChoiceOption>,
    checked: Vec<bool>,
    cursor: usize,
}

impl MultiSelect {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        let checked = vec![false; options.len()];
        Self {
            options,
            checked,
            cursor: 0,
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn checked(&self) -> &[bool] {
        &self.checked
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.options.len();
    }

    pub fn previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.options.len() - 1
        } else {
            self.cursor - 1
        };
    }

    /// Flip the flag under the cursor. The cursor stays put.
    pub fn toggle(&mut self) {
        if let Some(flag) = self.checked.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    pub fn set_checked(&mut self, ids: &[String]) {
        for (option, flag) in self.options.iter().zip(self.checked.iter_mut()) {
            *flag = ids.contains(&option.id);
        }
    }

    /// Checked ids in option-list order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.id.clone())
            .collect()
    }
}

/// Single-line text entry with a fallback value.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars
    cursor: usize,
    default: String,
}

impl TextInput {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            default: default.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let index = self.byte_index();
        self.value.remove(index);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    /// Entered text, or the default when nothing was typed.
    pub fn committed(&self) -> String {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            self.default.clone()
        } else {
            trimmed.to_string()
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ids: &[&str]) -> Vec<ChoiceOption> {
        ids.iter().map(|id| ChoiceOption::new(*id, "")).collect()
    }

    #[test]
    fn single_select_wraps() {
        let mut select = SingleSelect::new(opts(&["a", "b", "c"]));
        select.previous();
        assert_eq!(select.selected_id().as_deref(), Some("c"));
        select.next();
        assert_eq!(select.selected_id().as_deref(), Some("a"));
    }

    #[test]
    fn single_select_set_options_resets_cursor() {
        let mut select = SingleSelect::new(opts(&["a", "b"]));
        select.next();
        select.set_options(opts(&["x", "y"]));
        assert_eq!(select.cursor(), 0);
    }

    #[test]
    fn multi_select_toggle_keeps_cursor_and_order() {
        let mut select = MultiSelect::new(opts(&["a", "b", "c"]));
        select.next();
        select.next();
        select.toggle();
        assert_eq!(select.cursor(), 2);
        select.previous();
        select.previous();
        select.toggle();

        assert_eq!(select.selected_ids(), vec!["a", "c"]);

        select.toggle();
        assert_eq!(select.selected_ids(), vec!["c"]);
    }

    #[test]
    fn multi_select_empty_is_inert() {
        let mut select = MultiSelect::new(Vec::new());
        select.next();
        select.toggle();
        assert!(select.selected_ids().is_empty());
    }

    #[test]
    fn text_input_editing() {
        let mut input = TextInput::new("~/.dotfiles");
        for c in "~/dots".chars() {
            input.insert_char(c);
        }
        input.move_cursor_left();
        input.delete_char();
        assert_eq!(input.value(), "~/dos");
        assert_eq!(input.committed(), "~/dos");
    }

    #[test]
    fn text_input_empty_commits_default() {
        let mut input = TextInput::new("~/.dotfiles");
        input.insert_char(' ');
        assert_eq!(input.committed(), "~/.dotfiles");
    }
}
