use serde::{Deserialize, Serialize};

use super::{GroupRef, RoleRef};

/// Activation state shared by users (applications have their own, with a
/// maintenance mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
}

/// An operator-managed account. `roles` and `groups` are the backend's
/// authoritative association lists; a user's groups are expected to be
/// reachable through its roles, but the client treats that as display
/// information and never enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: EntityStatus,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
}

/// Create payload for `POST /users/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: EntityStatus,
}

/// Partial update payload for `PUT /users/{id}/`. Omitted fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}
