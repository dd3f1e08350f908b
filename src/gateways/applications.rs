use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::application::{ApplicationUpdate, NewApplication};
use crate::models::{Application, Group, User};

pub struct ApplicationsGateway {
    client: Arc<ApiClient>,
}

impl ApplicationsGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Application>, ApiError> {
        self.client.list("/applications/").await
    }

    pub async fn get(&self, id: i64) -> Result<Application, ApiError> {
        self.client.get(&format!("/applications/{id}/")).await
    }

    pub async fn create(&self, application: &NewApplication) -> Result<Application, ApiError> {
        self.client.post("/applications/", application).await
    }

    pub async fn update(
        &self,
        id: i64,
        update: &ApplicationUpdate,
    ) -> Result<Application, ApiError> {
        self.client
            .put(&format!("/applications/{id}/"), update)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/applications/{id}/")).await
    }

    /// Groups granted access to this application.
    pub async fn groups(&self, id: i64) -> Result<Vec<Group>, ApiError> {
        self.client
            .list(&format!("/applications/{id}/groups/"))
            .await
    }

    /// Every user who can reach this application through some group.
    pub async fn users_with_access(&self, id: i64) -> Result<Vec<User>, ApiError> {
        self.client
            .list(&format!("/applications/{id}/users_with_access/"))
            .await
    }

    /// Cycle active → inactive → active; maintenance is left to an explicit
    /// `update`. Returns the application in its new state.
    pub async fn toggle_status(&self, id: i64) -> Result<Application, ApiError> {
        self.client
            .post(
                &format!("/applications/{id}/toggle_status/"),
                &serde_json::json!({}),
            )
            .await
    }
}
