use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::{ApiError, DashboardApi};
use crate::logic::align::align_series;
use crate::model::{AlignedSeriesSet, DatasetId, DimensionSummary, Timeseries, TimeseriesQuery};

/// Shown when a metrics fetch fails without a backend reason
pub const METRICS_FAILED: &str = "Failed to load metrics";

/// Everything the metrics view renders for the current selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsViewState {
    pub dataset_id: Option<DatasetId>,
    pub loading: bool,
    pub summary: Option<Vec<DimensionSummary>>,
    pub series: Option<AlignedSeriesSet>,
    pub error: Option<String>,
}

impl MetricsViewState {
    fn loading(dataset_id: DatasetId) -> Self {
        Self {
            dataset_id: Some(dataset_id),
            loading: true,
            ..Self::default()
        }
    }

    /// Join both fetches. Either failure discards the other result.
    fn settled(
        dataset_id: DatasetId,
        summary: Result<Vec<DimensionSummary>, ApiError>,
        series: Result<Vec<Timeseries>, ApiError>,
    ) -> Self {
        match (summary, series) {
            (Ok(summary), Ok(series)) => Self {
                dataset_id: Some(dataset_id),
                loading: false,
                summary: Some(summary),
                series: Some(align_series(&series)),
                error: None,
            },
            (Err(e), _) | (Ok(_), Err(e)) => Self {
                dataset_id: Some(dataset_id),
                loading: false,
                summary: None,
                series: None,
                error: Some(e.display_message(METRICS_FAILED)),
            },
        }
    }
}

/// Tag carried by an in-flight fetch pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    generation: u64,
    dataset_id: DatasetId,
}

/// Drives the dataset-scoped metrics view.
///
/// Every selection bumps a generation counter and tags its fetches with it.
/// A result is published only if its tag is still the latest, so a slow
/// response for an earlier selection can never overwrite a newer one.
pub struct MetricsOrchestrator<A: ?Sized> {
    api: Arc<A>,
    generation: Mutex<u64>,
    state: watch::Sender<MetricsViewState>,
}

impl<A: DashboardApi + ?Sized> MetricsOrchestrator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            generation: Mutex::new(0),
            state: watch::channel(MetricsViewState::default()).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsViewState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> MetricsViewState {
        self.state.borrow().clone()
    }

    /// Change the selected dataset and fetch its metrics.
    ///
    /// Resolves once the fetch pair has settled. Returns `false` when the
    /// result was dropped because another selection happened meanwhile.
    pub async fn select(&self, dataset_id: Option<DatasetId>) -> bool {
        let Some(dataset_id) = dataset_id else {
            self.begin(MetricsViewState::default());
            return true;
        };

        let ticket = Ticket {
            generation: self.begin(MetricsViewState::loading(dataset_id)),
            dataset_id,
        };

        let query = TimeseriesQuery::default();
        let (summary, series) = tokio::join!(
            self.api.latest_summary(dataset_id),
            self.api.timeseries(dataset_id, &query)
        );

        self.publish(ticket, MetricsViewState::settled(dataset_id, summary, series))
    }

    /// Refetch the current selection, if any
    pub async fn refresh(&self) -> bool {
        let selected = self.state.borrow().dataset_id;
        self.select(selected).await
    }

    fn begin(&self, initial: MetricsViewState) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.send_replace(initial);
        *generation
    }

    fn publish(&self, ticket: Ticket, next: MetricsViewState) -> bool {
        let generation = self.generation.lock();
        if *generation != ticket.generation {
            debug!(
                "Discarding stale metrics for dataset {} (generation {}, current {})",
                ticket.dataset_id, ticket.generation, *generation
            );
            return false;
        }

        self.state.send_replace(next);
        true
    }
}
