//! Dataset state owned by the dashboard. Mutated only on the UI thread.

use crate::analytics::AnalyticsView;
use crate::api::{GradientResponse, UploadResponse};
use crate::chart::{ChartHost, ChartSpec};
use crate::cli::ChartType;
use crate::summary::DatasetSummary;
use crate::table::TableView;
use crate::upload::SelectedFile;

/// Output region a request renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Table,
    Chart,
}

/// Per-target request counters. Only a response carrying the newest number
/// for its target is applied.
#[derive(Debug, Default, Clone)]
pub struct RequestSequence {
    table: u64,
    chart: u64,
}

impl RequestSequence {
    fn slot(&mut self, target: Target) -> &mut u64 {
        match target {
            Target::Table => &mut self.table,
            Target::Chart => &mut self.chart,
        }
    }

    /// Number for a new request; older outstanding ones become stale.
    pub fn issue(&mut self, target: Target) -> u64 {
        let slot = self.slot(target);
        *slot += 1;
        *slot
    }

    /// Make every outstanding request for `target` stale.
    pub fn invalidate(&mut self, target: Target) {
        self.issue(target);
    }

    pub fn is_current(&self, target: Target, seq: u64) -> bool {
        let current = match target {
            Target::Table => self.table,
            Target::Chart => self.chart,
        };
        seq == current
    }
}

/// Summary of the last successful upload plus the reply's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDataset {
    pub summary: DatasetSummary,
    pub filename: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    /// Chosen for the next upload
    pub selected_file: Option<SelectedFile>,
    /// Last file successfully handed to `/upload`
    pub current_file: Option<SelectedFile>,
    pub current_data: Option<UploadedDataset>,
    pub chart_type: ChartType,
    pub chart: ChartHost,
    pub results: Option<TableView>,
    pub upload_in_flight: bool,
    pub sequences: RequestSequence,
}

impl AppState {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            selected_file: None,
            current_file: None,
            current_data: None,
            chart_type,
            chart: ChartHost::default(),
            results: None,
            upload_in_flight: false,
            sequences: RequestSequence::default(),
        }
    }

    /// Gate for sort, search and gradient.
    pub fn has_upload(&self) -> bool {
        self.current_data.is_some() && self.current_file.is_some()
    }

    pub fn summary(&self) -> Option<&DatasetSummary> {
        self.current_data.as_ref().map(|d| &d.summary)
    }

    /// Replace the dataset after a successful upload: clear results, render the
    /// summary chart, and make in-flight queries stale.
    pub fn apply_upload(&mut self, file: SelectedFile, response: UploadResponse) {
        self.current_file = Some(file);
        self.current_data = Some(UploadedDataset {
            summary: response.summary,
            filename: response.filename,
            message: response.message,
        });
        self.results = None;
        self.sequences.invalidate(Target::Table);
        self.render_summary_chart();
    }

    /// Re-render the chart from the held summary. Returns false when none is held.
    pub fn render_summary_chart(&mut self) -> bool {
        let Some(data) = self.current_data.as_ref() else {
            return false;
        };
        let spec = ChartSpec::summary(&data.summary, self.chart_type);
        self.sequences.invalidate(Target::Chart);
        self.chart.render(spec);
        true
    }

    /// Switch chart type; re-renders locally from the summary.
    pub fn set_chart_type(&mut self, chart_type: ChartType) -> bool {
        self.chart_type = chart_type;
        self.render_summary_chart()
    }

    pub fn apply_gradient(&mut self, response: &GradientResponse, requested_column: &str) {
        let column = if response.column.is_empty() {
            requested_column
        } else {
            response.column.as_str()
        };
        self.chart
            .render(ChartSpec::gradient(column, &response.gradients));
    }

    pub fn column_names(&self) -> Vec<String> {
        self.summary().map(|s| s.columns.clone()).unwrap_or_default()
    }

    pub fn analytics_view(&self) -> Option<AnalyticsView> {
        self.current_data.as_ref().map(|d| {
            AnalyticsView::build(&d.summary, d.message.as_deref(), d.filename.as_deref())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> UploadResponse {
        serde_json::from_value(json!({
            "message": "File uploaded successfully",
            "filename": "people.csv",
            "summary": {
                "columns": ["age", "income"],
                "row_count": 2,
                "mean_values": {"age": 30.0, "income": 100.0}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_sequence_latest_wins() {
        let mut seq = RequestSequence::default();
        let a = seq.issue(Target::Table);
        let b = seq.issue(Target::Table);
        let c = seq.issue(Target::Chart);
        assert!(!seq.is_current(Target::Table, a));
        assert!(seq.is_current(Target::Table, b));
        assert!(seq.is_current(Target::Chart, c));
        seq.invalidate(Target::Chart);
        assert!(!seq.is_current(Target::Chart, c));
    }

    #[test]
    fn test_apply_upload() {
        let mut state = AppState::new(ChartType::Bar);
        assert!(!state.has_upload());
        state.results = Some(crate::table::build_table("old", &[]));
        let pending = state.sequences.issue(Target::Table);

        state.apply_upload(SelectedFile::from_path("people.csv"), response());

        assert!(state.has_upload());
        assert!(state.results.is_none());
        assert!(!state.sequences.is_current(Target::Table, pending));
        assert_eq!(state.chart.live_instances(), 1);
        assert_eq!(state.column_names(), vec!["age", "income"]);
        let view = state.analytics_view().unwrap();
        assert_eq!(
            view.header.as_deref(),
            Some("File uploaded successfully (people.csv)")
        );
    }

    #[test]
    fn test_chart_type_switch_without_summary_is_noop() {
        let mut state = AppState::new(ChartType::Bar);
        assert!(!state.set_chart_type(ChartType::Pie));
        assert_eq!(state.chart_type, ChartType::Pie);
        assert!(state.chart.current().is_none());
    }

    #[test]
    fn test_chart_type_switch_rerenders() {
        let mut state = AppState::new(ChartType::Bar);
        state.apply_upload(SelectedFile::from_path("people.csv"), response());
        assert!(state.set_chart_type(ChartType::Line));
        assert_eq!(state.chart.live_instances(), 1);
        assert_eq!(
            state.chart.spec().map(|s| s.chart_type),
            Some(ChartType::Line)
        );
    }

    #[test]
    fn test_apply_gradient_uses_requested_column_fallback() {
        let mut state = AppState::new(ChartType::Bar);
        let resp = GradientResponse {
            column: String::new(),
            gradients: vec![Some(1.0)],
        };
        state.apply_gradient(&resp, "age");
        assert_eq!(
            state.chart.spec().map(|s| s.title.as_str()),
            Some("Gradient of age")
        );
    }
}
