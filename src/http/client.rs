//! Authenticated request pipeline.
//!
//! Every call goes through [`ApiClient::request`]: obtain a token from the
//! session manager, attach it as a bearer header, send, and map the
//! response into the error taxonomy. The one cross-cutting recovery this
//! stage owns is the 401 interception: refresh the session and resend the
//! original request exactly once. A 401 on the resent request surfaces as
//! `NotAuthenticated` — never a third attempt. 5xx and transport failures
//! are surfaced for the caller to retry on its own schedule; nothing else
//! is retried automatically.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::ListResponse;
use crate::session::SessionManager;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    /// Wire a client and its session manager from configuration, sharing
    /// one `reqwest::Client` between the two.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn crate::session::TokenStore>,
    ) -> anyhow::Result<(Arc<SessionManager>, Self)> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        let session = Arc::new(SessionManager::new(
            http.clone(),
            config.base_url.clone(),
            store,
        ));
        let client = Self::new(http, config.base_url.clone(), Arc::clone(&session));
        Ok((session, client))
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // ── Request pipeline ─────────────────────────────────────

    /// Issue an authenticated request and return the decoded JSON body
    /// (`Null` for empty bodies such as a 204).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = self.session.ensure_fresh_token().await?;
        let mut resp = self.send_once(&method, path, body, &token).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!(%method, path, "got 401, refreshing and retrying once");
            let token = self.session.refresh().await?;
            resp = self.send_once(&method, path, body, &token).await?;
            if resp.status() == StatusCode::UNAUTHORIZED {
                warn!(%method, path, "still 401 after refresh");
                return Err(ApiError::NotAuthenticated);
            }
        }

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if status.is_success() {
            if bytes.is_empty() {
                return Ok(serde_json::Value::Null);
            }
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "request failed");
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    // ── Typed helpers ────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a list endpoint, normalizing the paged wrapper and the bare
    /// array into one ordered sequence.
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let value = self.request(Method::GET, path, None).await?;
        let list: ListResponse<T> = serde_json::from_value(value)?;
        Ok(list.into_results())
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let value = self.request(Method::POST, path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST where the caller does not care about the response body
    /// (actions like invites and bulk deletes).
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body)).await?;
        Ok(())
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let value = self.request(Method::PUT, path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }
}
