use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::role::{NewRole, RoleUpdate};
use crate::models::{Role, User};

pub struct RolesGateway {
    client: Arc<ApiClient>,
}

impl RolesGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Role>, ApiError> {
        self.client.list("/roles/").await
    }

    pub async fn get(&self, id: i64) -> Result<Role, ApiError> {
        self.client.get(&format!("/roles/{id}/")).await
    }

    pub async fn create(&self, role: &NewRole) -> Result<Role, ApiError> {
        self.client.post("/roles/", role).await
    }

    pub async fn update(&self, id: i64, update: &RoleUpdate) -> Result<Role, ApiError> {
        self.client.put(&format!("/roles/{id}/"), update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/roles/{id}/")).await
    }

    /// Users currently holding this role.
    pub async fn users(&self, id: i64) -> Result<Vec<User>, ApiError> {
        self.client.list(&format!("/roles/{id}/users/")).await
    }

    /// Replace the role's group attachments with the given set.
    pub async fn set_groups(&self, id: i64, group_ids: &[i64]) -> Result<Role, ApiError> {
        self.client
            .put(
                &format!("/roles/{id}/"),
                &serde_json::json!({"group_ids": group_ids}),
            )
            .await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.client
            .post_unit("/roles/bulk_delete/", &serde_json::json!({"ids": ids}))
            .await
    }

    /// Apply the same partial update to every listed role.
    pub async fn bulk_update(&self, ids: &[i64], patch: &RoleUpdate) -> Result<(), ApiError> {
        self.client
            .post_unit(
                "/roles/bulk_update/",
                &serde_json::json!({"ids": ids, "data": patch}),
            )
            .await
    }
}
