use log::info;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::api::{ApiError, DashboardApi};
use crate::model::{Credential, LoginRequest};
use crate::store::CredentialStore;

/// Shown when the backend rejects a login without a reason
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Views the routing layer can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Users,
}

impl Route {
    /// Unknown paths land on the dashboard
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/users" => Route::Users,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Users => "/users",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login rejected: {0}")]
    Rejected(#[source] ApiError),
    #[error("failed to update stored credential: {0:#}")]
    Storage(anyhow::Error),
}

impl SessionError {
    /// Message for the login form
    pub fn message(&self) -> String {
        match self {
            SessionError::Rejected(e) => e.display_message(LOGIN_FAILED),
            SessionError::Storage(e) => format!("{}: {:#}", LOGIN_FAILED, e),
        }
    }
}

/// Sole writer of the credential store and owner of the session signal.
///
/// The published state always mirrors the store: `Authenticated` exactly when
/// a credential is stored.
pub struct SessionController<A: ?Sized> {
    api: Arc<A>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    navigation: watch::Sender<Route>,
}

impl<A: DashboardApi + ?Sized> SessionController<A> {
    pub fn new(api: Arc<A>, store: Arc<dyn CredentialStore>) -> Self {
        let (initial, landing) = if store.get().is_some() {
            (SessionState::Authenticated, Route::Dashboard)
        } else {
            (SessionState::Unauthenticated, Route::Login)
        };

        Self {
            api,
            store,
            state: watch::channel(initial).0,
            navigation: watch::channel(landing).0,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Navigation requests emitted by login and logout
    pub fn navigation(&self) -> watch::Receiver<Route> {
        self.navigation.subscribe()
    }

    /// Route to actually render for `requested`; protected views redirect to
    /// login while unauthenticated.
    pub fn guard(&self, requested: Route) -> Route {
        if requested.is_protected() && !self.is_authenticated() {
            Route::Login
        } else {
            requested
        }
    }

    /// Exchange email and password for a credential.
    /// On failure neither the store nor the state changes.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let token = self.api.login(&request).await.map_err(SessionError::Rejected)?;
        self.store
            .set(Credential::new(token.access_token))
            .map_err(SessionError::Storage)?;

        info!("Logged in as {}", email);
        self.state.send_replace(SessionState::Authenticated);
        self.navigation.send_replace(Route::Dashboard);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().map_err(SessionError::Storage)?;

        info!("Logged out");
        self.state.send_replace(SessionState::Unauthenticated);
        self.navigation.send_replace(Route::Login);
        Ok(())
    }
}
