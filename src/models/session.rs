use serde::{Deserialize, Serialize};

/// The stored token pair. Created at login, replaced in place on every
/// successful refresh, destroyed on logout or irrecoverable refresh failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer credential attached to every request.
    #[serde(rename = "access_token")]
    pub access: String,
    /// Longer-lived credential used only to mint new access tokens.
    #[serde(rename = "refresh_token")]
    pub refresh: String,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}
