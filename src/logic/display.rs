//! Display-ready shapes for the metrics view.

use chrono::{DateTime, Utc};

use crate::model::{AlignedSeriesSet, Dimension, DimensionSummary};

/// Shown instead of a value for a dimension without data
pub const NO_VALUE: &str = "—";
/// Shown instead of a timestamp for a dimension without data
pub const NO_DATA: &str = "No data";
/// Empty cell in a rendered aligned table
pub const ABSENT_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub dimension: Dimension,
    pub value: String,
    pub recorded_at: String,
}

impl From<&DimensionSummary> for SummaryCard {
    fn from(summary: &DimensionSummary) -> Self {
        Self {
            dimension: summary.dimension,
            value: format_value(summary.latest_value),
            recorded_at: summary
                .latest_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| NO_DATA.to_string()),
        }
    }
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.3}", value),
        None => NO_VALUE.to_string(),
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render an aligned set as a plain text table, one line per axis entry
pub fn render_table(aligned: &AlignedSeriesSet) -> String {
    let labels = aligned.labels();
    let time_width = labels.iter().map(String::len).max().unwrap_or(0).max("time".len());

    let mut header = format!("{:<width$}", "time", width = time_width);
    for row in &aligned.rows {
        header.push_str(&format!("  {:>12}", row.metric_name));
    }

    let mut lines = vec![header];
    for (index, label) in labels.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = time_width);
        for row in &aligned.rows {
            let cell = match row.values.get(index).copied().flatten() {
                Some(value) => format!("{:.3}", value),
                None => ABSENT_CELL.to_string(),
            };
            line.push_str(&format!("  {:>12}", cell));
        }
        lines.push(line);
    }

    lines.join("\n")
}
