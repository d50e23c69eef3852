use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::model::{AlignedRow, AlignedSeriesSet, Timeseries};

/// Re-express independently sampled series over one shared time axis.
///
/// The axis is every distinct `recorded_at` across all points, ascending.
/// Each series gets one row, in input order, holding the value recorded at
/// exactly that instant or `None`; nothing is interpolated. When a series
/// holds two points with the same timestamp the later point wins.
pub fn align_series(series: &[Timeseries]) -> AlignedSeriesSet {
    let axis: Vec<DateTime<Utc>> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.recorded_at))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rows = series
        .iter()
        .map(|s| {
            let mut values = vec![None; axis.len()];
            for point in &s.points {
                if let Ok(slot) = axis.binary_search(&point.recorded_at) {
                    values[slot] = Some(point.value);
                }
            }
            AlignedRow {
                metric_name: s.metric_name.clone(),
                values,
            }
        })
        .collect();

    AlignedSeriesSet { axis, rows }
}
