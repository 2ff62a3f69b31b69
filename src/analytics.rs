//! View model of the analytics panel: stat cards and the two summary panels.

use crate::summary::DatasetSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsView {
    /// Upload metadata (server message, stored file name)
    pub header: Option<String>,
    pub cards: Vec<StatCard>,
    /// "Statistical Summary": Mean, Median, Mode
    pub statistical: Vec<SummaryLine>,
    /// "Range Summary": Max, Min
    pub range: Vec<SummaryLine>,
}

pub const STATISTICAL_TITLE: &str = "Statistical Summary";
pub const RANGE_TITLE: &str = "Range Summary";

impl AnalyticsView {
    pub fn build(summary: &DatasetSummary, message: Option<&str>, filename: Option<&str>) -> Self {
        let header = match (message, filename) {
            (Some(m), Some(f)) => Some(format!("{} ({})", m, f)),
            (Some(m), None) => Some(m.to_string()),
            (None, Some(f)) => Some(f.to_string()),
            (None, None) => None,
        };

        Self {
            header,
            cards: vec![
                StatCard {
                    label: "Columns",
                    value: summary.columns.len().to_string(),
                },
                StatCard {
                    label: "Rows",
                    value: summary.row_count.to_string(),
                },
                StatCard {
                    label: "Numeric Columns",
                    value: summary.numeric_column_count().to_string(),
                },
            ],
            statistical: vec![
                SummaryLine {
                    label: "Mean",
                    text: summary.mean_values.format_fixed2(),
                },
                SummaryLine {
                    label: "Median",
                    text: summary.median_values.format_fixed2(),
                },
                SummaryLine {
                    label: "Mode",
                    text: summary.format_mode(),
                },
            ],
            range: vec![
                SummaryLine {
                    label: "Max",
                    text: summary.max_values.format_raw(),
                },
                SummaryLine {
                    label: "Min",
                    text: summary.min_values.format_raw(),
                },
            ],
        }
    }

    pub fn line(&self, label: &str) -> Option<&str> {
        self.statistical
            .iter()
            .chain(self.range.iter())
            .find(|l| l.label == label)
            .map(|l| l.text.as_str())
    }

    pub fn card(&self, label: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }
}
