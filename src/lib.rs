pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

#[cfg(test)]
mod test_support;

pub use api::{ApiError, DashboardApi, Gateway};
pub use logic::{
    align_series, MetricsOrchestrator, MetricsViewState, Route, SessionController, SessionError,
    SessionState, UserAdmin,
};
pub use model::*;
pub use store::{CredentialSource, CredentialStore, FileCredentialStore, MemoryCredentialStore};

use std::sync::Arc;

/// Fully wired client: one credential store shared by the gateway (read
/// side) and the session controller (write side).
pub struct Dashboard {
    pub gateway: Arc<Gateway>,
    pub session: SessionController<Gateway>,
    pub metrics: MetricsOrchestrator<Gateway>,
    pub users: UserAdmin<Gateway>,
}

impl Dashboard {
    pub fn new<S>(client: reqwest::Client, base_url: &str, store: Arc<S>) -> Self
    where
        S: CredentialStore + 'static,
    {
        let gateway = Arc::new(Gateway::new(client, base_url, store.clone()));
        Self {
            session: SessionController::new(gateway.clone(), store),
            metrics: MetricsOrchestrator::new(gateway.clone()),
            users: UserAdmin::new(gateway.clone()),
            gateway,
        }
    }

    /// Wire a client from configuration, restoring any persisted session
    pub fn from_config(config: &crate::config::AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(FileCredentialStore::open(&config.session.credential_path));
        let client = config.api.build_client()?;
        Ok(Self::new(client, &config.api.base_url, store))
    }
}
