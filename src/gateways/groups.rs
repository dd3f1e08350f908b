use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::group::{GroupUpdate, NewGroup};
use crate::models::{Group, Role};

pub struct GroupsGateway {
    client: Arc<ApiClient>,
}

impl GroupsGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Group>, ApiError> {
        self.client.list("/groups/").await
    }

    pub async fn get(&self, id: i64) -> Result<Group, ApiError> {
        self.client.get(&format!("/groups/{id}/")).await
    }

    pub async fn create(&self, group: &NewGroup) -> Result<Group, ApiError> {
        self.client.post("/groups/", group).await
    }

    pub async fn update(&self, id: i64, update: &GroupUpdate) -> Result<Group, ApiError> {
        self.client.put(&format!("/groups/{id}/"), update).await
    }

    /// The backend rejects deleting a group that roles still reference;
    /// that surfaces here as `Forbidden`.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/groups/{id}/")).await
    }

    /// Roles attached to this group.
    pub async fn roles(&self, id: i64) -> Result<Vec<Role>, ApiError> {
        self.client.list(&format!("/groups/{id}/roles/")).await
    }

    /// Replace the group's application grants with the given set.
    pub async fn set_applications(
        &self,
        id: i64,
        application_ids: &[i64],
    ) -> Result<Group, ApiError> {
        self.client
            .put(
                &format!("/groups/{id}/"),
                &serde_json::json!({"application_ids": application_ids}),
            )
            .await
    }
}
