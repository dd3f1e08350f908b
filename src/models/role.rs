use serde::{Deserialize, Serialize};

use super::{GroupRef, PermissionRef};

/// A named bundle of permissions, attachable to users and groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub permissions: Vec<PermissionRef>,
}

/// `{id, name}` pair embedded in other entities' association lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: i64,
    pub name: String,
}

/// Create payload for `POST /roles/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
}

/// Partial update payload, also used as the `data` member of
/// `POST /roles/bulk_update/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
