//! Scripted in-process backend shared by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;
use tokio::sync::watch;

use crate::api::{ApiError, DashboardApi};
use crate::model::{
    Dataset, DatasetId, Dimension, DimensionSummary, LoginRequest, NewUser, Timeseries,
    TimeseriesPoint, TimeseriesQuery, Token, User,
};

#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(status: StatusCode, detail: Option<&str>) -> Self {
        Self {
            status,
            detail: detail.map(str::to_string),
        }
    }

    fn into_error(self) -> ApiError {
        ApiError::Status {
            status: self.status,
            detail: self.detail,
        }
    }
}

pub type Outcome<T> = Result<T, Failure>;

/// Holds responses back until opened
pub struct Gate(watch::Sender<bool>);

impl Gate {
    pub fn new() -> Self {
        Self(watch::channel(false).0)
    }

    pub fn open(&self) {
        self.0.send_replace(true);
    }

    fn receiver(&self) -> watch::Receiver<bool> {
        self.0.subscribe()
    }
}

#[derive(Clone)]
struct Script {
    summary: Outcome<Vec<DimensionSummary>>,
    series: Outcome<Vec<Timeseries>>,
    gate: Option<watch::Receiver<bool>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    ListDatasets,
    Summary(DatasetId),
    Series(DatasetId),
    ListUsers,
    CreateUser(String),
}

#[derive(Default)]
pub struct ScriptedApi {
    scripts: Mutex<HashMap<DatasetId, Script>>,
    login: Mutex<Option<Outcome<Token>>>,
    datasets: Mutex<Option<Outcome<Vec<Dataset>>>>,
    users: Mutex<Vec<User>>,
    users_failure: Mutex<Option<Failure>>,
    create_failure: Mutex<Option<Failure>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_metrics(
        &self,
        dataset_id: DatasetId,
        summary: Outcome<Vec<DimensionSummary>>,
        series: Outcome<Vec<Timeseries>>,
        gate: Option<&Gate>,
    ) {
        self.scripts.lock().insert(
            dataset_id,
            Script {
                summary,
                series,
                gate: gate.map(Gate::receiver),
            },
        );
    }

    pub fn script_login(&self, outcome: Outcome<Token>) {
        *self.login.lock() = Some(outcome);
    }

    pub fn script_datasets(&self, outcome: Outcome<Vec<Dataset>>) {
        *self.datasets.lock() = Some(outcome);
    }

    pub fn fail_users(&self, failure: Failure) {
        *self.users_failure.lock() = Some(failure);
    }

    pub fn fail_create(&self, failure: Failure) {
        *self.create_failure.lock() = Some(failure);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    fn script(&self, dataset_id: DatasetId) -> Script {
        self.scripts.lock().get(&dataset_id).cloned().unwrap_or(Script {
            summary: Err(Failure::new(StatusCode::NOT_FOUND, Some("Dataset not found"))),
            series: Err(Failure::new(StatusCode::NOT_FOUND, Some("Dataset not found"))),
            gate: None,
        })
    }

    async fn wait(gate: Option<watch::Receiver<bool>>) {
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|open| *open).await;
        }
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn login(&self, request: &LoginRequest) -> Result<Token, ApiError> {
        self.calls.lock().push(Call::Login(request.email.clone()));
        let outcome = self
            .login
            .lock()
            .clone()
            .unwrap_or_else(|| Err(Failure::new(StatusCode::UNAUTHORIZED, None)));
        outcome.map_err(Failure::into_error)
    }

    async fn list_datasets(&self) -> Result<Vec<Dataset>, ApiError> {
        self.calls.lock().push(Call::ListDatasets);
        let outcome = self.datasets.lock().clone().unwrap_or_else(|| Ok(Vec::new()));
        outcome.map_err(Failure::into_error)
    }

    async fn latest_summary(&self, dataset_id: DatasetId) -> Result<Vec<DimensionSummary>, ApiError> {
        self.calls.lock().push(Call::Summary(dataset_id));
        let script = self.script(dataset_id);
        Self::wait(script.gate).await;
        script.summary.map_err(Failure::into_error)
    }

    async fn timeseries(
        &self,
        dataset_id: DatasetId,
        _query: &TimeseriesQuery,
    ) -> Result<Vec<Timeseries>, ApiError> {
        self.calls.lock().push(Call::Series(dataset_id));
        let script = self.script(dataset_id);
        Self::wait(script.gate).await;
        script.series.map_err(Failure::into_error)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.calls.lock().push(Call::ListUsers);
        if let Some(failure) = self.users_failure.lock().clone() {
            return Err(failure.into_error());
        }
        Ok(self.users.lock().clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.calls.lock().push(Call::CreateUser(user.email.clone()));
        if let Some(failure) = self.create_failure.lock().clone() {
            return Err(failure.into_error());
        }

        let mut users = self.users.lock();
        let created = User {
            id: users.len() as i64 + 1,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            is_admin: user.is_admin,
            dataset_ids: user.dataset_ids.clone(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

pub fn summary(dimension: Dimension, value: Option<f64>) -> DimensionSummary {
    DimensionSummary {
        dimension,
        latest_value: value,
        latest_at: value.map(|_| crate::model::timestamp::parse("2024-01-01T00:00:00Z").unwrap()),
    }
}

pub fn single_point_series(metric_name: &str, ts: &str, value: f64) -> Timeseries {
    Timeseries {
        metric_name: metric_name.to_string(),
        points: vec![TimeseriesPoint {
            recorded_at: crate::model::timestamp::parse(ts).unwrap(),
            value,
        }],
    }
}

pub fn dataset(id: DatasetId, name: &str) -> Dataset {
    Dataset {
        id,
        key: name.to_lowercase(),
        name: name.to_string(),
        description: None,
        is_active: true,
    }
}
