use serde::{Deserialize, Serialize};

use crate::model::DatasetId;

/// User account as returned by `GET /users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(default)]
    pub dataset_ids: Vec<DatasetId>,
}

impl User {
    pub fn role(&self) -> &'static str {
        if self.is_admin {
            "Admin"
        } else {
            "User"
        }
    }

    pub fn status(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Body of `POST /users`.
/// Email uniqueness and password length are enforced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub dataset_ids: Vec<DatasetId>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: None,
            password: password.into(),
            is_admin: false,
            is_active: true,
            dataset_ids: Vec::new(),
        }
    }

    /// Grant access to `dataset_id`, or revoke it if already granted
    pub fn toggle_dataset(&mut self, dataset_id: DatasetId) {
        if let Some(pos) = self.dataset_ids.iter().position(|id| *id == dataset_id) {
            self.dataset_ids.remove(pos);
        } else {
            self.dataset_ids.push(dataset_id);
        }
    }
}
