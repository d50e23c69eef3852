use crate::api::DashboardApi;
use crate::model::Dataset;

/// Shown when the dataset selector cannot be filled
pub const DATASETS_FAILED: &str = "Failed to load datasets";

/// Datasets for the selector, or a display-ready error
pub async fn load_datasets<A: DashboardApi + ?Sized>(api: &A) -> Result<Vec<Dataset>, String> {
    api.list_datasets()
        .await
        .map_err(|e| e.display_message(DATASETS_FAILED))
}
