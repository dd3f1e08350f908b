use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the RBAC backend, including the API prefix.
    /// Set via RBAC_API_BASE_URL. Default: http://localhost:8000/api/v1
    pub base_url: String,
    /// Per-request timeout in seconds for the underlying HTTP client.
    /// Set via RBAC_HTTP_TIMEOUT_SECS. Default: 30.
    pub timeout_secs: u64,
    /// Where the session file (access + refresh token pair) is persisted.
    /// Set via RBAC_TOKEN_PATH. Default: .rbac-session.json in cwd.
    pub token_path: PathBuf,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("RBAC_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000/api/v1".into());

    if base_url.ends_with('/') {
        anyhow::bail!("RBAC_API_BASE_URL must not end with a slash (paths are joined with one)");
    }

    Ok(Config {
        base_url,
        timeout_secs: std::env::var("RBAC_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        token_path: std::env::var("RBAC_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".rbac-session.json")),
    })
}
