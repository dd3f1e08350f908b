use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::user::{NewUser, UserUpdate};
use crate::models::User;

pub struct UsersGateway {
    client: Arc<ApiClient>,
}

impl UsersGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.list("/users/").await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.client.get(&format!("/users/{id}/")).await
    }

    /// The authenticated operator's own profile.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/users/me/").await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.client.post("/users/", user).await
    }

    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.client.put(&format!("/users/{id}/"), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{id}/")).await
    }

    /// Replace the user's role assignments with the given set.
    pub async fn set_roles(&self, id: i64, role_ids: &[i64]) -> Result<User, ApiError> {
        self.client
            .put(
                &format!("/users/{id}/"),
                &serde_json::json!({"role_ids": role_ids}),
            )
            .await
    }

    /// Replace the user's group memberships with the given set.
    pub async fn set_groups(&self, id: i64, group_ids: &[i64]) -> Result<User, ApiError> {
        self.client
            .put(
                &format!("/users/{id}/"),
                &serde_json::json!({"group_ids": group_ids}),
            )
            .await
    }

    /// Trigger the backend's invitation mail for a pending user.
    pub async fn send_invite(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("/users/{id}/send-invite/"), &serde_json::json!({}))
            .await
    }
}
