use serde::Deserialize;

/// The backend answers list endpoints with either a DRF-style page wrapper
/// or a bare array, depending on the endpoint. Both shapes are modeled here
/// once and normalized with [`ListResponse::into_results`]; call sites never
/// probe the shape themselves.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paged {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Flat(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Collapse either shape into the ordered item sequence.
    pub fn into_results(self) -> Vec<T> {
        match self {
            ListResponse::Paged { results, .. } => results,
            ListResponse::Flat(items) => items,
        }
    }

    /// Total item count when the backend reports one; flat responses only
    /// know their own length.
    pub fn count(&self) -> Option<u64> {
        match self {
            ListResponse::Paged { count, .. } => *count,
            ListResponse::Flat(items) => Some(items.len() as u64),
        }
    }
}
