pub mod claims;
pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// True when a URL carries the `?logout=true` teardown marker. The console
/// honors it by calling [`SessionManager::logout`] before rendering anything.
pub fn logout_requested(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    parsed
        .query_pairs()
        .any(|(k, v)| k == "logout" && v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_marker_detected() {
        assert!(logout_requested("https://console.example.com/?logout=true"));
        assert!(logout_requested(
            "https://console.example.com/users?page=2&logout=true"
        ));
    }

    #[test]
    fn test_logout_marker_absent_or_false() {
        assert!(!logout_requested("https://console.example.com/"));
        assert!(!logout_requested("https://console.example.com/?logout=false"));
        assert!(!logout_requested("not a url"));
    }
}
