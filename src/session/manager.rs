//! Session lifecycle: login, logout, verification, and the single-flight
//! token refresh.
//!
//! The manager is constructed explicitly (store + HTTP client + base URL)
//! and handed to the API client at startup; nothing here is global. The
//! refresh discipline guarantees at most one outstanding
//! `POST /token/refresh/` system-wide: callers that need a fresh token
//! while one is in flight attach to the same shared future and observe the
//! identical outcome, success or failure. The in-flight slot is cleared
//! when the call settles, whether or not any waiters remain.

use std::sync::Arc;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::ApiError;
use crate::models::Session;
use crate::session::claims;
use crate::session::store::TokenStore;

type RefreshFuture = Shared<BoxFuture<'static, Result<String, ApiError>>>;

#[derive(Default)]
struct RefreshState {
    in_flight: Mutex<Option<RefreshFuture>>,
}

/// Token pair as the login endpoints return it.
#[derive(Debug, Deserialize)]
struct TokenPairResponse {
    access: String,
    refresh: String,
}

/// Body of a successful `POST /token/refresh/`.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

pub struct SessionManager {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    state: Arc<RefreshState>,
}

impl SessionManager {
    /// `base_url` includes the API prefix and carries no trailing slash,
    /// e.g. `http://localhost:8000/api/v1`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            store,
            state: Arc::new(RefreshState::default()),
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    // ── Login / logout ───────────────────────────────────────

    /// Exchange credentials for a token pair and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.obtain_tokens(
            "/token/",
            serde_json::json!({"email": email, "password": password}),
        )
        .await
    }

    /// Exchange a federated-identity assertion (Google ID token) for a
    /// token pair and persist it.
    pub async fn login_with_google(&self, id_token: &str) -> Result<Session, ApiError> {
        self.obtain_tokens("/google-login/", serde_json::json!({"token": id_token}))
            .await
    }

    async fn obtain_tokens(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Session, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "login rejected");
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        let pair: TokenPairResponse = resp.json().await?;
        let session = Session::new(pair.access, pair.refresh);
        self.store.set(session.clone()).await;
        info!("session established");
        Ok(session)
    }

    /// Ask the backend whether a token is currently valid.
    pub async fn verify(&self, token: &str) -> Result<bool, ApiError> {
        let url = format!("{}/token/verify/", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({"token": token}))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Drop the stored token pair. Safe to call when already logged out.
    pub async fn logout(&self) {
        self.store.clear().await;
        info!("session cleared");
    }

    // ── Token freshness ──────────────────────────────────────

    /// Return an access token that is not locally known to be expired,
    /// refreshing it first if necessary. No stored session fails
    /// immediately with `NotAuthenticated` and no network call.
    pub async fn ensure_fresh_token(&self) -> Result<String, ApiError> {
        let session = self.store.get().await.ok_or(ApiError::NotAuthenticated)?;
        if !claims::is_expired(&session.access, Utc::now()) {
            return Ok(session.access);
        }
        debug!("access token expired, refreshing");
        self.refresh().await
    }

    /// Force a refresh, joining the in-flight one if it exists. Used by
    /// the 401 interceptor, where the backend has overruled the local
    /// expiry check.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let fut = {
            let mut slot = self.state.in_flight.lock().await;
            match slot.as_ref() {
                Some(existing) => {
                    debug!("refresh already in flight, attaching");
                    existing.clone()
                }
                None => {
                    let fut = Self::run_refresh(
                        self.http.clone(),
                        format!("{}/token/refresh/", self.base_url),
                        Arc::clone(&self.store),
                        Arc::clone(&self.state),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// The one network call of a refresh flight. Owns the settle
    /// bookkeeping: the in-flight slot is cleared before the shared
    /// outcome is handed to the waiters.
    async fn run_refresh(
        http: reqwest::Client,
        url: String,
        store: Arc<dyn TokenStore>,
        state: Arc<RefreshState>,
    ) -> Result<String, ApiError> {
        let result = Self::call_refresh_endpoint(&http, &url, &store).await;
        if result.is_err() {
            // Irrecoverable: the refresh token is spent or the backend is
            // refusing it. Tear the session down before releasing the slot
            // so the next caller fails fast with NotAuthenticated instead
            // of starting another doomed flight.
            store.clear().await;
            warn!("token refresh failed, session cleared");
        }
        *state.in_flight.lock().await = None;
        result
    }

    async fn call_refresh_endpoint(
        http: &reqwest::Client,
        url: &str,
        store: &Arc<dyn TokenStore>,
    ) -> Result<String, ApiError> {
        let session = store.get().await.ok_or(ApiError::RefreshFailed)?;
        if session.refresh.is_empty() {
            return Err(ApiError::RefreshFailed);
        }

        let resp = http
            .post(url)
            .json(&serde_json::json!({"refresh": session.refresh}))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "refresh call failed");
                ApiError::RefreshFailed
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "refresh rejected");
            return Err(ApiError::RefreshFailed);
        }

        let body: RefreshResponse = resp.json().await.map_err(|e| {
            warn!(error = %e, "refresh response undecodable");
            ApiError::RefreshFailed
        })?;

        // Refresh token is kept: the endpoint only rotates the access half.
        store
            .set(Session::new(body.access.clone(), session.refresh))
            .await;
        debug!("access token refreshed");
        Ok(body.access)
    }
}
