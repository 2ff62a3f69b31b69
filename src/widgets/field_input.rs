//! One-line text field of a parameter dialog.
//!
//! Editing is delegated to `tui-textarea`; the field only forwards editing
//! keys, keeps the text on a single line, and maps Up/Down to its
//! [`FieldHistory`]. Enter, Esc and Tab belong to the dialog.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

use super::history::FieldHistory;
use crate::cache::CacheManager;
use crate::config::Theme;

pub struct FieldInput {
    textarea: TextArea<'static>,
    value: String,
    history: Option<FieldHistory>,
    text_style: Style,
    cursor_style: Style,
    focused: bool,
}

impl FieldInput {
    pub fn new(theme: &Theme) -> Self {
        let text_style = Style::default()
            .fg(theme.get("text_primary"))
            .bg(theme.get("surface"));
        let cursor_style = match theme.get("cursor_focused") {
            Color::Reset => text_style.add_modifier(Modifier::REVERSED),
            color => Style::default().fg(theme.get("surface")).bg(color),
        };
        let mut field = Self {
            textarea: TextArea::default(),
            value: String::new(),
            history: None,
            text_style,
            cursor_style,
            focused: false,
        };
        field.restyle();
        field
    }

    pub fn with_history(mut self, history: FieldHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn history(&self) -> Option<&FieldHistory> {
        self.history.as_ref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.restyle();
    }

    /// Replace the text, cursor at the end. Line breaks become spaces.
    pub fn set_value(&mut self, value: &str) {
        self.textarea = TextArea::new(vec![value.replace(['\r', '\n'], " ")]);
        self.textarea.move_cursor(CursorMove::End);
        self.restyle();
        self.sync_value();
    }

    /// Insert at the cursor, e.g. pasted text. Only the first line is used.
    pub fn insert(&mut self, text: &str) {
        let line = text.lines().next().unwrap_or_default();
        if self.textarea.insert_str(line) {
            self.sync_value();
        }
    }

    pub fn load_history(&mut self, cache: &CacheManager) -> Result<()> {
        match self.history.as_mut() {
            Some(history) => history.load(cache),
            None => Ok(()),
        }
    }

    /// Store the current value in this field's history.
    pub fn record_history(&mut self, cache: &CacheManager) -> Result<()> {
        match self.history.as_mut() {
            Some(history) => history.record(cache, &self.value),
            None => Ok(()),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, cache: Option<&CacheManager>) {
        match key.code {
            KeyCode::Up => {
                let current = self.value.clone();
                let entry = self
                    .history
                    .as_mut()
                    .and_then(|h| h.older(&current, cache))
                    .map(str::to_string);
                if let Some(entry) = entry {
                    self.set_value(&entry);
                }
            }
            KeyCode::Down => {
                if let Some(entry) = self.history.as_mut().and_then(FieldHistory::newer) {
                    self.set_value(&entry);
                }
            }
            _ => {
                let Some(input) = editing_input(key) else {
                    return;
                };
                if self.textarea.input(input) {
                    self.sync_value();
                    if let Some(history) = self.history.as_mut() {
                        history.stop_browsing();
                    }
                }
            }
        }
    }

    fn sync_value(&mut self) {
        self.value = self.textarea.lines().first().cloned().unwrap_or_default();
    }

    fn restyle(&mut self) {
        self.textarea.set_style(self.text_style);
        self.textarea.set_cursor_line_style(Style::default());
        // an unfocused field draws its cursor like plain text
        self.textarea.set_cursor_style(if self.focused {
            self.cursor_style
        } else {
            self.text_style
        });
    }
}

/// Keys that edit the line. Anything that would break it (Enter, Ctrl+M,
/// Ctrl+J) or belongs to the dialog is dropped.
fn editing_input(key: &KeyEvent) -> Option<Input> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let code = match key.code {
        KeyCode::Char('m' | 'j') if ctrl => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(Input {
        key: code,
        ctrl,
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    })
}

impl Widget for &FieldInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.textarea.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use tempfile::TempDir;

    fn field() -> FieldInput {
        FieldInput::new(&Theme::from_config(&ThemeConfig::default()).unwrap())
    }

    fn press(field: &mut FieldInput, code: KeyCode, cache: Option<&CacheManager>) {
        field.handle_key(&KeyEvent::new(code, KeyModifiers::NONE), cache);
    }

    fn type_str(field: &mut FieldInput, s: &str) {
        for c in s.chars() {
            press(field, KeyCode::Char(c), None);
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = field();
        type_str(&mut input, "incomes");
        press(&mut input, KeyCode::Backspace, None);
        assert_eq!(input.value(), "income");
        press(&mut input, KeyCode::Home, None);
        type_str(&mut input, "net_");
        assert_eq!(input.value(), "net_income");
    }

    #[test]
    fn test_line_breaks_never_enter_the_value() {
        let mut input = field();
        type_str(&mut input, "age");
        press(&mut input, KeyCode::Enter, None);
        input.handle_key(
            &KeyEvent::new(KeyCode::Char('m'), KeyModifiers::CONTROL),
            None,
        );
        assert_eq!(input.value(), "age");

        input.set_value("New\nYork");
        assert_eq!(input.value(), "New York");
        input.insert("!\nignored");
        assert_eq!(input.value(), "New York!");
    }

    #[test]
    fn test_focus_toggles() {
        let mut input = field();
        assert!(!input.is_focused());
        input.set_focused(true);
        assert!(input.is_focused());
    }

    #[test]
    fn test_up_down_recall_history() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(dir.path().to_path_buf());

        let mut first = field().with_history(FieldHistory::new("column", 100));
        type_str(&mut first, "age");
        first.record_history(&cache).unwrap();

        let mut second = field().with_history(FieldHistory::new("column", 100));
        type_str(&mut second, "inc");
        press(&mut second, KeyCode::Up, Some(&cache));
        assert_eq!(second.value(), "age");
        press(&mut second, KeyCode::Down, Some(&cache));
        assert_eq!(second.value(), "inc");
    }

    #[test]
    fn test_field_without_history_ignores_up() {
        let mut input = field();
        type_str(&mut input, "city");
        press(&mut input, KeyCode::Up, None);
        assert_eq!(input.value(), "city");
        assert!(input.history().is_none());
    }
}
