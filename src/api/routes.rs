use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::api::gateway::Gateway;
use crate::model::{
    Dataset, DatasetId, DimensionSummary, LoginRequest, NewUser, Timeseries, TimeseriesQuery,
    Token, User,
};

pub const LOGIN: &str = "/auth/login";
pub const DATASETS: &str = "/datasets";
pub const USERS: &str = "/users";
pub const METRICS_LATEST: &str = "/metrics/latest";
pub const METRICS_TIMESERIES: &str = "/metrics/timeseries";

/// REST contract of the data-quality backend
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<Token, ApiError>;
    async fn list_datasets(&self) -> Result<Vec<Dataset>, ApiError>;
    /// One summary per dimension for `dataset_id`
    async fn latest_summary(&self, dataset_id: DatasetId) -> Result<Vec<DimensionSummary>, ApiError>;
    async fn timeseries(
        &self,
        dataset_id: DatasetId,
        query: &TimeseriesQuery,
    ) -> Result<Vec<Timeseries>, ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;
}

#[async_trait]
impl DashboardApi for Gateway {
    async fn login(&self, request: &LoginRequest) -> Result<Token, ApiError> {
        self.post_json(LOGIN, request).await
    }

    async fn list_datasets(&self) -> Result<Vec<Dataset>, ApiError> {
        self.get_json(DATASETS).await
    }

    async fn latest_summary(&self, dataset_id: DatasetId) -> Result<Vec<DimensionSummary>, ApiError> {
        self.get_json_with_query(METRICS_LATEST, &[("dataset_id", dataset_id)]).await
    }

    async fn timeseries(
        &self,
        dataset_id: DatasetId,
        query: &TimeseriesQuery,
    ) -> Result<Vec<Timeseries>, ApiError> {
        self.get_json_with_query(METRICS_TIMESERIES, &query.to_params(dataset_id)).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(USERS).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.post_json(USERS, user).await
    }
}
