use std::collections::BTreeMap;

use thiserror::Error;

/// Field-level validation messages as the backend reports them:
/// `{"email": ["user with this email already exists."]}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error taxonomy for every call that crosses the wire.
///
/// `Clone` is required because a single refresh outcome is fanned out to
/// every caller waiting on the in-flight refresh future.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session refresh failed")]
    RefreshFailed,

    #[error("validation failed: {errors:?}")]
    Validation { errors: FieldErrors },

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("server error: {status}")]
    Server { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status: {status}")]
    Unexpected { status: u16 },

    #[error("response decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success backend response to the taxonomy. 401 is not
    /// handled here: the HTTP wrapper owns the refresh-and-retry recovery
    /// and only maps a 401 after that recovery is spent.
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        match status {
            400 => ApiError::Validation {
                errors: parse_field_errors(body),
            },
            401 => ApiError::NotAuthenticated,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500..=599 => ApiError::Server { status },
            _ => ApiError::Unexpected { status },
        }
    }

    /// True for errors a caller may reasonably retry on its own schedule.
    /// The client itself never auto-retries these.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Server { .. } | ApiError::Transport(_))
    }

    /// True when the session is unusable and the operator must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated | ApiError::RefreshFailed)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// The backend reports 400s as `{"field": ["msg", ...]}`, sometimes with a
/// bare-string message, sometimes under a `"detail"` key. Everything is
/// folded into the field→messages map; unrecognized bodies become a
/// `non_field_errors` entry so nothing is silently dropped.
fn parse_field_errors(body: &serde_json::Value) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match body {
        serde_json::Value::Object(map) => {
            for (field, value) in map {
                let messages = match value {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect(),
                    serde_json::Value::String(s) => vec![s.clone()],
                    other => vec![other.to_string()],
                };
                errors.insert(field.clone(), messages);
            }
        }
        serde_json::Value::String(s) => {
            errors.insert("non_field_errors".into(), vec![s.clone()]);
        }
        _ => {}
    }
    errors
}
