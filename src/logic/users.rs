use std::sync::Arc;
use tokio::sync::watch;

use crate::api::DashboardApi;
use crate::model::{Dataset, NewUser, User};

pub const LOAD_FAILED: &str = "Failed to load";
pub const CREATE_FAILED: &str = "Create failed";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersViewState {
    pub users: Vec<User>,
    /// Datasets offered as access grants
    pub datasets: Vec<Dataset>,
    pub error: Option<String>,
}

/// User administration: list accounts and create new ones with grants
pub struct UserAdmin<A: ?Sized> {
    api: Arc<A>,
    state: watch::Sender<UsersViewState>,
}

impl<A: DashboardApi + ?Sized> UserAdmin<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: watch::channel(UsersViewState::default()).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UsersViewState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> UsersViewState {
        self.state.borrow().clone()
    }

    /// Fetch users and datasets together. On failure the previous lists stay
    /// and only the error is set.
    pub async fn load(&self) {
        let (users, datasets) = tokio::join!(self.api.list_users(), self.api.list_datasets());

        self.state.send_modify(|state| match (users, datasets) {
            (Ok(users), Ok(datasets)) => {
                state.users = users;
                state.datasets = datasets;
                state.error = None;
            }
            (Err(e), _) | (Ok(_), Err(e)) => {
                state.error = Some(e.display_message(LOAD_FAILED));
            }
        });
    }

    /// Create `user`, then reload the lists
    pub async fn create(&self, user: &NewUser) -> Result<User, String> {
        self.state.send_modify(|state| state.error = None);

        match self.api.create_user(user).await {
            Ok(created) => {
                self.load().await;
                Ok(created)
            }
            Err(e) => {
                let message = e.display_message(CREATE_FAILED);
                self.state.send_modify(|state| state.error = Some(message.clone()));
                Err(message)
            }
        }
    }
}
