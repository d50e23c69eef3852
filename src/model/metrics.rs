use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::timestamp;

/// One axis of data quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Completeness,
    Timeliness,
    Validity,
    Accuracy,
    Consistency,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Completeness,
        Dimension::Timeliness,
        Dimension::Validity,
        Dimension::Accuracy,
        Dimension::Consistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Completeness => "completeness",
            Dimension::Timeliness => "timeliness",
            Dimension::Validity => "validity",
            Dimension::Accuracy => "accuracy",
            Dimension::Consistency => "consistency",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known value of one dimension for one dataset.
/// Both fields are `None` when the dimension has no data yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub dimension: Dimension,
    #[serde(default)]
    pub latest_value: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub latest_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Samples of one metric. Points are not guaranteed to be sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub metric_name: String,
    pub points: Vec<TimeseriesPoint>,
}

/// Optional filters accepted by `GET /metrics/timeseries`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeseriesQuery {
    pub dimension: Option<Dimension>,
    pub metric_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeseriesQuery {
    /// Query string pairs, `dataset_id` first
    pub fn to_params(&self, dataset_id: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![("dataset_id", dataset_id.to_string())];
        if let Some(dimension) = self.dimension {
            params.push(("dimension", dimension.as_str().to_string()));
        }
        if let Some(ref metric_name) = self.metric_name {
            params.push(("metric_name", metric_name.clone()));
        }
        if let Some(ref start) = self.start {
            params.push(("start", timestamp::label(start)));
        }
        if let Some(ref end) = self.end {
            params.push(("end", timestamp::label(end)));
        }
        params
    }
}

/// One metric re-expressed over the shared axis of an [`AlignedSeriesSet`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub metric_name: String,
    /// One slot per axis entry, `None` where the series has no sample
    pub values: Vec<Option<f64>>,
}

/// Several series over one distinct, ascending time axis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedSeriesSet {
    pub axis: Vec<DateTime<Utc>>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedSeriesSet {
    pub fn labels(&self) -> Vec<String> {
        self.axis.iter().map(timestamp::label).collect()
    }

    pub fn row(&self, metric_name: &str) -> Option<&AlignedRow> {
        self.rows.iter().find(|row| row.metric_name == metric_name)
    }

    pub fn value_at(&self, metric_name: &str, index: usize) -> Option<f64> {
        self.row(metric_name)
            .and_then(|row| row.values.get(index).copied())
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }
}
