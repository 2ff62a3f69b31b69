//! Chart model: what to draw (series, labels, titles) and the single chart
//! slot that owns the live instance.
//!
//! A [`ChartSpec`] is built by pure functions from the summary or a gradient
//! reply; [`ChartHost`] holds at most one instance and always destroys the
//! current one before creating its replacement.

use crate::cli::ChartType;
use crate::summary::{DatasetSummary, NumericStats};

/// Series names of the summary chart, in draw order.
pub const SUMMARY_SERIES: [&str; 4] = ["Mean Values", "Median Values", "Max Values", "Min Values"];

/// Theme keys for series colors, in draw order.
pub const SERIES_COLOR_KEYS: [&str; 4] = [
    "chart_series_color_1",
    "chart_series_color_2",
    "chart_series_color_3",
    "chart_series_color_4",
];

/// Fixed palette used for PNG export (terminal colors come from the theme).
pub const SERIES_RGB: [(u8, u8, u8); 4] = [(220, 38, 38), (234, 88, 12), (239, 68, 68), (245, 101, 101)];

pub const SUMMARY_TITLE: &str = "Data Visualization";
pub const SUMMARY_X_TITLE: &str = "Columns";
pub const SUMMARY_Y_TITLE: &str = "Values";
pub const GRADIENT_X_TITLE: &str = "Row Index";
pub const GRADIENT_Y_TITLE: &str = "Gradient Values";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSource {
    Summary,
    Gradient { column: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One value per label; None = missing
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub begin_at_zero: bool,
    pub source: ChartSource,
}

impl ChartSpec {
    /// Four-series chart of the summary; labels are the keys of `mean_values`.
    pub fn summary(summary: &DatasetSummary, chart_type: ChartType) -> Self {
        let labels: Vec<String> = summary.mean_values.keys().map(str::to_string).collect();
        let stats: [&NumericStats; 4] = [
            &summary.mean_values,
            &summary.median_values,
            &summary.max_values,
            &summary.min_values,
        ];
        let series = SUMMARY_SERIES
            .iter()
            .zip(stats)
            .map(|(name, stat)| ChartSeries {
                name: name.to_string(),
                values: labels.iter().map(|l| stat.get(l)).collect(),
            })
            .collect();

        Self {
            chart_type,
            title: SUMMARY_TITLE.to_string(),
            x_title: SUMMARY_X_TITLE.to_string(),
            y_title: SUMMARY_Y_TITLE.to_string(),
            labels,
            series,
            begin_at_zero: true,
            source: ChartSource::Summary,
        }
    }

    /// Line chart of per-row gradients, x = 1..n.
    pub fn gradient(column: &str, gradients: &[Option<f64>]) -> Self {
        let title = gradient_title(column);
        Self {
            chart_type: ChartType::Line,
            title: title.clone(),
            x_title: GRADIENT_X_TITLE.to_string(),
            y_title: GRADIENT_Y_TITLE.to_string(),
            labels: (1..=gradients.len()).map(|i| i.to_string()).collect(),
            series: vec![ChartSeries {
                name: title,
                values: gradients.to_vec(),
            }],
            begin_at_zero: false,
            source: ChartSource::Gradient {
                column: column.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            || self
                .series
                .iter()
                .all(|s| s.values.iter().all(|v| finite(*v).is_none()))
    }

    /// (min, max) over all finite values; includes 0 when `begin_at_zero`.
    /// A flat range is widened so the axis never collapses.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied().filter_map(finite))
            .peekable();
        values.peek()?;

        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), v| {
            (a.min(v), b.max(v))
        });
        if self.begin_at_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if max <= min {
            max = min + 1.0;
        }
        Some((min, max))
    }

    /// Points of one series; x is the 1-based label position.
    pub fn points(&self, series_idx: usize) -> Vec<(f64, f64)> {
        self.series
            .get(series_idx)
            .map(|s| {
                s.values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| finite(*v).map(|v| ((i + 1) as f64, v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Slice fractions of one series for the pie view; negatives count as 0.
    pub fn pie_fractions(&self, series_idx: usize) -> Vec<f64> {
        let Some(series) = self.series.get(series_idx) else {
            return Vec::new();
        };
        let values: Vec<f64> = series
            .values
            .iter()
            .map(|v| finite(*v).unwrap_or(0.0).max(0.0))
            .collect();
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return vec![0.0; values.len()];
        }
        values.iter().map(|v| v / total).collect()
    }
}

pub fn gradient_title(column: &str) -> String {
    format!("Gradient of {}", column)
}

/// Axis tick text: scientific for very large or very small magnitudes.
pub fn format_axis_label(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    pub id: u64,
    pub spec: ChartSpec,
}

/// The chart slot. Holds at most one live instance.
#[derive(Debug, Default)]
pub struct ChartHost {
    current: Option<ChartInstance>,
    next_id: u64,
    created: u64,
    destroyed: u64,
}

impl ChartHost {
    /// Destroy the current instance (if any), then create one for `spec`.
    pub fn render(&mut self, spec: ChartSpec) -> u64 {
        self.destroy();
        self.next_id += 1;
        self.created += 1;
        log::debug!(
            "chart.create id={} type={} series={} labels={}",
            self.next_id,
            spec.chart_type.as_str(),
            spec.series.len(),
            spec.labels.len()
        );
        self.current = Some(ChartInstance {
            id: self.next_id,
            spec,
        });
        self.next_id
    }

    pub fn destroy(&mut self) {
        if let Some(old) = self.current.take() {
            log::debug!("chart.destroy id={}", old.id);
            self.destroyed += 1;
        }
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.current.as_ref().map(|c| &c.spec)
    }

    pub fn live_instances(&self) -> u64 {
        self.created - self.destroyed
    }

    pub fn created(&self) -> u64 {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> DatasetSummary {
        serde_json::from_value(json!({
            "columns": ["age", "income", "city"],
            "row_count": 50,
            "mean_values": {"age": 34.2, "income": 55210},
            "median_values": {"income": 54000, "age": 33},
            "max_values": {"age": 61, "income": 120000},
            "min_values": {"age": 19, "income": 18000},
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_spec() {
        let spec = ChartSpec::summary(&summary(), ChartType::Bar);
        assert_eq!(spec.title, "Data Visualization");
        assert_eq!(spec.x_title, "Columns");
        assert_eq!(spec.y_title, "Values");
        assert_eq!(spec.labels, vec!["age", "income"]);
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, SUMMARY_SERIES.to_vec());
        // values align with labels even when key order differs
        assert_eq!(spec.series[1].values, vec![Some(33.0), Some(54000.0)]);
        assert!(spec.begin_at_zero);
    }

    #[test]
    fn test_gradient_spec() {
        let spec = ChartSpec::gradient("age", &[Some(1.0), Some(-0.5), None]);
        assert_eq!(spec.chart_type, ChartType::Line);
        assert_eq!(spec.title, "Gradient of age");
        assert_eq!(spec.series[0].name, "Gradient of age");
        assert_eq!(spec.x_title, "Row Index");
        assert_eq!(spec.y_title, "Gradient Values");
        assert_eq!(spec.labels, vec!["1", "2", "3"]);
        assert_eq!(spec.points(0), vec![(1.0, 1.0), (2.0, -0.5)]);
        assert_eq!(spec.value_bounds(), Some((-0.5, 1.0)));
    }

    #[test]
    fn test_bounds_begin_at_zero() {
        let spec = ChartSpec::summary(&summary(), ChartType::Line);
        assert_eq!(spec.value_bounds(), Some((0.0, 120000.0)));
        let empty = ChartSpec::gradient("x", &[]);
        assert!(empty.is_empty());
        assert_eq!(empty.value_bounds(), None);
    }

    #[test]
    fn test_pie_fractions() {
        let spec = ChartSpec::gradient("x", &[Some(1.0), Some(3.0), Some(-2.0)]);
        assert_eq!(spec.pie_fractions(0), vec![0.25, 0.75, 0.0]);
        assert!(spec.pie_fractions(5).is_empty());
    }

    #[test]
    fn test_format_axis_label() {
        assert_eq!(format_axis_label(0.0), "0.00");
        assert_eq!(format_axis_label(34.2), "34.20");
        assert_eq!(format_axis_label(1_200_000.0), "1.20e6");
        assert_eq!(format_axis_label(0.005), "5.00e-3");
    }

    #[test]
    fn test_host_keeps_single_instance() {
        let mut host = ChartHost::default();
        assert_eq!(host.live_instances(), 0);
        let first = host.render(ChartSpec::summary(&summary(), ChartType::Bar));
        let second = host.render(ChartSpec::summary(&summary(), ChartType::Pie));
        assert_ne!(first, second);
        assert_eq!(host.live_instances(), 1);
        assert_eq!(host.created(), 2);
        assert_eq!(host.current().map(|c| c.id), Some(second));
        host.destroy();
        assert_eq!(host.live_instances(), 0);
        assert!(host.spec().is_none());
    }
}
