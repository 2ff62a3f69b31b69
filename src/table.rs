//! Results table view model: at most [`MAX_TABLE_ROWS`] rows, headers taken
//! from the first row's keys.

use crate::api::{Row, StatsResponse};
use crate::summary::display_value;

pub const MAX_TABLE_ROWS: usize = 10;
pub const EMPTY_PLACEHOLDER: &str = "No results found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Empty {
        title: String,
        placeholder: &'static str,
    },
    Rows {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        total: usize,
        footer: String,
    },
}

impl TableView {
    pub fn title(&self) -> &str {
        match self {
            Self::Empty { title, .. } | Self::Rows { title, .. } => title,
        }
    }
}

pub fn footer_text(total: usize) -> String {
    format!(
        "Showing up to {} rows of {} total results.",
        MAX_TABLE_ROWS, total
    )
}

/// Build the table for a result sequence. Rows missing a header key render
/// an empty cell; keys absent from the first row are not shown.
pub fn build_table(title: impl Into<String>, rows: &[Row]) -> TableView {
    let title = title.into();
    let Some(first) = rows.first() else {
        return TableView::Empty {
            title,
            placeholder: EMPTY_PLACEHOLDER,
        };
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let body = rows
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).map(display_value).unwrap_or_default())
                .collect()
        })
        .collect();

    TableView::Rows {
        title,
        headers,
        rows: body,
        total: rows.len(),
        footer: footer_text(rows.len()),
    }
}

/// Table listing the server's uploaded files.
pub fn stats_table(stats: &StatsResponse) -> TableView {
    let rows: Vec<Row> = stats
        .files
        .iter()
        .filter_map(|file| match serde_json::to_value(file) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        })
        .collect();
    build_table(format!("Uploaded Files ({})", stats.total_files), &rows)
}

pub fn sort_title(column: &str, order: impl std::fmt::Display) -> String {
    format!("Sorted by {} ({})", column, order)
}

pub fn search_title(query: &str, column: &str) -> String {
    format!("Search Results for \"{}\" in {}", query, column)
}
