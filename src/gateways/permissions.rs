use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::Permission;

/// Permissions are static reference data; the console only ever reads them
/// to populate role editors.
pub struct PermissionsGateway {
    client: Arc<ApiClient>,
}

impl PermissionsGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Permission>, ApiError> {
        self.client.list("/permissions/").await
    }
}
