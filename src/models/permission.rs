use serde::{Deserialize, Serialize};

/// Static reference data: a `(resource, action)` grant. Read-only from the
/// client's side; only roles reference permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub resource: String,
    pub action: String,
}

/// `{id, name}` pair embedded in role association lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRef {
    pub id: i64,
    pub name: String,
}
