//! Dataset summary as returned by `/upload`, plus the text formatting used by
//! the analytics panel.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Ordered mapping column -> numeric statistic. Keys keep server order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NumericStats(pub Vec<(String, Option<f64>)>);

impl From<Map<String, Value>> for NumericStats {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(k, v)| (k, v.as_f64())).collect())
    }
}

impl NumericStats {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(k, _)| k == column)
            .and_then(|(_, v)| *v)
    }

    /// "k: v" pairs with two decimals, joined with ", "
    pub fn format_fixed2(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}: {:.2}", k, v),
                None => format!("{}: null", k),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "k: v" pairs with values in shortest form
    pub fn format_raw(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}: {}", k, display_f64(*v)),
                None => format!("{}: null", k),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Summary statistics for one uploaded CSV.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetSummary {
    pub columns: Vec<String>,
    pub row_count: u64,
    pub mean_values: NumericStats,
    pub median_values: NumericStats,
    pub max_values: NumericStats,
    pub min_values: NumericStats,
    pub mode_values: Map<String, Value>,
    pub numeric_columns: Option<Vec<String>>,
}

impl DatasetSummary {
    /// Count shown on the "Numeric Columns" card.
    pub fn numeric_column_count(&self) -> usize {
        self.mean_values.len()
    }

    pub fn format_mode(&self) -> String {
        self.mode_values
            .iter()
            .map(|(k, v)| format!("{}: {}", k, display_value(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Shortest text form of a number; integral values print without a fraction.
pub fn display_f64(v: f64) -> String {
    if v.is_finite() {
        format!("{}", v)
    } else if v.is_nan() {
        "NaN".to_string()
    } else if v > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Text form of a JSON cell: strings raw, numbers shortest, null as `null`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => n.as_f64().map(display_f64).unwrap_or_else(|| n.to_string()),
        },
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
