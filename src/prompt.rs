//! Parameter dialog for sort, search, gradient, open-file and sample loading.
//!
//! A dialog is a short form of text fields (plus an asc/desc toggle for sort).
//! Keys are fed through [`ParamDialog::handle_key`], which reports a
//! [`DialogOutcome`]: still editing, cancelled, or submitted with typed values.
//! Submitting with an empty required field counts as a cancellation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

use crate::api::{SearchRequest, SortOrder, SortRequest};
use crate::cache::CacheManager;
use crate::config::Theme;
use crate::widgets::field_input::FieldInput;
use crate::widgets::history::FieldHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Sort,
    Search,
    Gradient,
    OpenFile,
    Sample,
}

impl DialogKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Sort => " Sort Data ",
            Self::Search => " Search Data ",
            Self::Gradient => " Compute Gradient ",
            Self::OpenFile => " Open CSV File ",
            Self::Sample => " Load Sample Data ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Column name, with Ctrl+N/Ctrl+P completion
    Column,
    Text,
    Order,
}

pub struct DialogField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub input: FieldInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogValues {
    Sort(SortRequest),
    Search(SearchRequest),
    Gradient { column: String },
    OpenFile(PathBuf),
    Sample(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Pending,
    Cancelled,
    Submitted(DialogValues),
}

pub struct ParamDialog {
    pub kind: DialogKind,
    pub fields: Vec<DialogField>,
    pub order: SortOrder,
    pub focus: usize,
    columns: Vec<String>,
    completion: Option<usize>,
}

fn text_field(
    label: &'static str,
    hint: &'static str,
    kind: FieldKind,
    history_id: &str,
    history_limit: usize,
    theme: &Theme,
) -> DialogField {
    let mut input = FieldInput::new(theme);
    if history_limit > 0 {
        input = input.with_history(FieldHistory::new(history_id, history_limit));
    }
    DialogField {
        label,
        hint,
        kind,
        input,
    }
}

impl ParamDialog {
    /// `columns` feeds completion; `history_limit` 0 disables history.
    pub fn new(kind: DialogKind, columns: Vec<String>, history_limit: usize, theme: &Theme) -> Self {
        let column = || {
            text_field(
                "Column",
                "Ctrl+N/Ctrl+P: cycle columns",
                FieldKind::Column,
                "column",
                history_limit,
                theme,
            )
        };
        let fields = match kind {
            DialogKind::Sort => vec![
                column(),
                DialogField {
                    label: "Order",
                    hint: "←/→ or Space: asc / desc",
                    kind: FieldKind::Order,
                    input: FieldInput::new(theme),
                },
            ],
            DialogKind::Search => vec![
                column(),
                text_field(
                    "Query",
                    "case-insensitive substring",
                    FieldKind::Text,
                    "search_query",
                    history_limit,
                    theme,
                ),
            ],
            DialogKind::Gradient => vec![column()],
            DialogKind::OpenFile => vec![text_field(
                "Path",
                "path to a .csv file",
                FieldKind::Text,
                "open_path",
                history_limit,
                theme,
            )],
            DialogKind::Sample => vec![text_field(
                "File name",
                "e.g. sample_data.csv",
                FieldKind::Text,
                "sample_name",
                history_limit,
                theme,
            )],
        };

        let mut dialog = Self {
            kind,
            fields,
            order: SortOrder::Asc,
            focus: 0,
            columns,
            completion: None,
        };
        dialog.sync_focus();
        dialog
    }

    fn sync_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.input.set_focused(i == self.focus);
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
        self.sync_focus();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        self.sync_focus();
    }

    fn is_last(&self) -> bool {
        self.focus + 1 == self.fields.len()
    }

    pub fn focused_field(&self) -> Option<&DialogField> {
        self.fields.get(self.focus)
    }

    /// Set a field's text (prefill).
    pub fn set_field_value(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.input.set_value(value);
        }
    }

    /// Pasted text goes into the focused text field at the cursor.
    pub fn paste(&mut self, text: &str) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.kind != FieldKind::Order {
                field.input.insert(text);
            }
        }
    }

    fn cycle_column(&mut self, forward: bool) {
        if self.columns.is_empty() {
            return;
        }
        let n = self.columns.len();
        let next = match (self.completion, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        self.completion = Some(next);
        let value = self.columns[next].clone();
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.input.set_value(&value);
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, cache: Option<&CacheManager>) -> DialogOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(field_kind) = self.focused_field().map(|f| f.kind) else {
            return DialogOutcome::Cancelled;
        };

        match key.code {
            KeyCode::Esc => return DialogOutcome::Cancelled,
            KeyCode::Enter => return self.advance_or_submit(cache),
            KeyCode::Tab => {
                self.focus_next();
                return DialogOutcome::Pending;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return DialogOutcome::Pending;
            }
            KeyCode::Char('n') if ctrl && field_kind == FieldKind::Column => {
                self.cycle_column(true);
                return DialogOutcome::Pending;
            }
            KeyCode::Char('p') if ctrl && field_kind == FieldKind::Column => {
                self.cycle_column(false);
                return DialogOutcome::Pending;
            }
            _ => {}
        }

        if field_kind == FieldKind::Order {
            return match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                    self.order = self.order.toggle();
                    DialogOutcome::Pending
                }
                KeyCode::Char('a') => {
                    self.order = SortOrder::Asc;
                    DialogOutcome::Pending
                }
                KeyCode::Char('d') => {
                    self.order = SortOrder::Desc;
                    DialogOutcome::Pending
                }
                _ => DialogOutcome::Pending,
            };
        }

        if let Some(field) = self.fields.get_mut(self.focus) {
            field.input.handle_key(key, cache);
        }
        DialogOutcome::Pending
    }

    fn advance_or_submit(&mut self, cache: Option<&CacheManager>) -> DialogOutcome {
        if self.is_last() {
            self.submit(cache)
        } else {
            self.focus_next();
            DialogOutcome::Pending
        }
    }

    fn text(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.input.value())
            .unwrap_or("")
    }

    /// Collect the values. Empty required fields cancel.
    pub fn submit(&mut self, cache: Option<&CacheManager>) -> DialogOutcome {
        if let Some(cache) = cache {
            for field in self.fields.iter_mut().filter(|f| f.kind != FieldKind::Order) {
                if let Err(e) = field.input.record_history(cache) {
                    log::warn!("history.save_failed err={}", e);
                }
            }
        }

        let first = self.text(0).trim().to_string();
        if first.is_empty() {
            return DialogOutcome::Cancelled;
        }

        let values = match self.kind {
            DialogKind::Sort => DialogValues::Sort(SortRequest {
                column: first,
                order: self.order,
            }),
            DialogKind::Search => {
                let query = self.text(1).to_string();
                if query.trim().is_empty() {
                    return DialogOutcome::Cancelled;
                }
                DialogValues::Search(SearchRequest {
                    column: first,
                    query,
                })
            }
            DialogKind::Gradient => DialogValues::Gradient { column: first },
            DialogKind::OpenFile => DialogValues::OpenFile(PathBuf::from(first)),
            DialogKind::Sample => DialogValues::Sample(first),
        };
        DialogOutcome::Submitted(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;

    fn theme() -> Theme {
        Theme::from_config(&ThemeConfig::default()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(dialog: &mut ParamDialog, s: &str) {
        for c in s.chars() {
            assert_eq!(
                dialog.handle_key(&key(KeyCode::Char(c)), None),
                DialogOutcome::Pending
            );
        }
    }

    #[test]
    fn test_sort_dialog_submits_column_and_order() {
        let mut dialog = ParamDialog::new(DialogKind::Sort, vec![], 0, &theme());
        type_str(&mut dialog, "age");
        assert_eq!(dialog.handle_key(&key(KeyCode::Enter), None), DialogOutcome::Pending);
        assert_eq!(dialog.focus, 1);
        dialog.handle_key(&key(KeyCode::Right), None);
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Submitted(DialogValues::Sort(SortRequest {
                column: "age".to_string(),
                order: SortOrder::Desc,
            }))
        );
    }

    #[test]
    fn test_empty_required_field_cancels() {
        let mut dialog = ParamDialog::new(DialogKind::Gradient, vec![], 0, &theme());
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Cancelled
        );

        let mut search = ParamDialog::new(DialogKind::Search, vec![], 0, &theme());
        type_str(&mut search, "city");
        search.handle_key(&key(KeyCode::Tab), None);
        assert_eq!(
            search.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Cancelled
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut dialog = ParamDialog::new(DialogKind::Search, vec![], 0, &theme());
        type_str(&mut dialog, "city");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Esc), None),
            DialogOutcome::Cancelled
        );
    }

    #[test]
    fn test_search_keeps_query_verbatim() {
        let mut dialog = ParamDialog::new(DialogKind::Search, vec![], 0, &theme());
        type_str(&mut dialog, "city");
        dialog.handle_key(&key(KeyCode::Enter), None);
        type_str(&mut dialog, " New York");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Submitted(DialogValues::Search(SearchRequest {
                column: "city".to_string(),
                query: " New York".to_string(),
            }))
        );
    }

    #[test]
    fn test_column_completion_cycles() {
        let columns = vec!["age".to_string(), "income".to_string()];
        let mut dialog = ParamDialog::new(DialogKind::Gradient, columns, 0, &theme());
        dialog.handle_key(&ctrl('n'), None);
        assert_eq!(dialog.text(0), "age");
        dialog.handle_key(&ctrl('n'), None);
        assert_eq!(dialog.text(0), "income");
        dialog.handle_key(&ctrl('n'), None);
        assert_eq!(dialog.text(0), "age");
        dialog.handle_key(&ctrl('p'), None);
        assert_eq!(dialog.text(0), "income");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Submitted(DialogValues::Gradient {
                column: "income".to_string()
            })
        );
    }

    #[test]
    fn test_open_file_dialog() {
        let mut dialog = ParamDialog::new(DialogKind::OpenFile, vec![], 0, &theme());
        dialog.set_field_value(0, "/tmp/people.csv");
        assert_eq!(
            dialog.handle_key(&key(KeyCode::Enter), None),
            DialogOutcome::Submitted(DialogValues::OpenFile(PathBuf::from("/tmp/people.csv")))
        );
    }
}
