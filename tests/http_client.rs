//! Integration tests for the authenticated request pipeline.
//!
//! These tests verify:
//! 1. The bearer token is attached to every request
//! 2. A 401 triggers refresh-and-resend exactly once; a second 401 surfaces
//! 3. Non-401 statuses map to the error taxonomy unmodified
//! 4. List bodies normalize identically for paged and flat shapes

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use chrono::Utc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rbac_admin_client::errors::ApiError;
use rbac_admin_client::http::ApiClient;
use rbac_admin_client::models::{Session, User};
use rbac_admin_client::session::{MemoryTokenStore, SessionManager, TokenStore};

fn jwt(exp: i64) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}

fn fresh_jwt() -> String {
    jwt(Utc::now().timestamp() + 3600)
}

/// Client wired against the mock server with a stored, locally-valid token.
async fn client_with_token(server: &MockServer, access: &str) -> ApiClient {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.set(Session::new(access, "ref-1")).await;
    let session = Arc::new(SessionManager::new(
        reqwest::Client::new(),
        server.uri(),
        store,
    ));
    ApiClient::new(reqwest::Client::new(), server.uri(), session)
}

fn user_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Ana",
        "email": "ana@example.com",
        "status": "active",
        "roles": [],
        "groups": []
    })
}

mod retry_on_401 {
    use super::*;

    /// Backend revoked the token early: the stored token is locally valid,
    /// the first send gets 401, the client refreshes and resends once.
    #[tokio::test]
    async fn test_401_refresh_resend_succeeds() {
        let server = MockServer::start().await;
        let stale = fresh_jwt();
        // Must differ byte-for-byte from `stale` so the wiremock header
        // matchers can tell the two attempts apart.
        let minted = jwt(Utc::now().timestamp() + 7200);

        Mock::given(method("GET"))
            .and(path("/users/1/"))
            .and(header("Authorization", format!("Bearer {stale}").as_str()))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "token revoked"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access": minted})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/1/"))
            .and(header("Authorization", format!("Bearer {minted}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_token(&server, &stale).await;
        let user: User = client.get("/users/1/").await.unwrap();
        assert_eq!(user.id, 1);
    }

    /// A 401 on the resent request surfaces as a failure — the wire sees
    /// exactly two attempts and one refresh, never a third attempt.
    #[tokio::test]
    async fn test_second_401_surfaces_without_third_attempt() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/1/"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "nope"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access": fresh_jwt()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client.get::<User>("/users/1/").await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated), "got {err:?}");
    }

    /// When the refresh behind a 401 fails, `RefreshFailed` propagates and
    /// the original request is not resent.
    #[tokio::test]
    async fn test_refresh_failure_after_401_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/1/"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "expired"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "blacklisted"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client.get::<User>("/users/1/").await.unwrap_err();
        assert!(matches!(err, ApiError::RefreshFailed), "got {err:?}");
    }
}

mod status_mapping {
    use super::*;

    #[tokio::test]
    async fn test_400_carries_field_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"email": ["user with this email already exists."]}),
            ))
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client
            .post::<User, _>("/users/", &serde_json::json!({"email": "dup@example.com"}))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation { errors } => {
                assert_eq!(errors["email"], vec!["user with this email already exists."]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_403_maps_to_forbidden() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/groups/3/"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"detail": "group is referenced by roles"})),
            )
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client.delete("/groups/3/").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden), "got {err:?}");
    }

    #[tokio::test]
    async fn test_404_maps_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/users/99/"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "not found"})),
            )
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client.delete("/users/99/").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound), "got {err:?}");
    }

    /// 5xx is surfaced, not auto-retried: one attempt on the wire.
    #[tokio::test]
    async fn test_5xx_surfaces_without_auto_retry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/roles/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let err = client.list::<serde_json::Value>("/roles/").await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 503 }), "got {err:?}");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_transport() {
        // A non-pooled server: dropping it actually closes the listener,
        // unlike `MockServer::start()` which returns the socket to
        // wiremock's pool still bound.
        let server = MockServer::builder().start().await;
        let client = client_with_token(&server, &fresh_jwt()).await;
        // Shut the server down so the connection is refused.
        drop(server);

        // Give the socket a moment to close.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = client.get::<User>("/users/1/").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }

    /// 204 No Content (delete) is success with no body to decode.
    #[tokio::test]
    async fn test_204_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/roles/4/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        client.delete("/roles/4/").await.unwrap();
    }
}

mod list_normalization {
    use super::*;

    /// `{results: [...]}` and a bare array produce the same sequence for
    /// identical underlying data.
    #[tokio::test]
    async fn test_paged_and_flat_bodies_normalize_identically() {
        let server = MockServer::start().await;
        let items = serde_json::json!([user_json(1), user_json(2)]);

        Mock::given(method("GET"))
            .and(path("/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": items,
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/roles/1/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items.clone()))
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let paged: Vec<User> = client.list("/users/").await.unwrap();
        let flat: Vec<User> = client.list("/roles/1/users/").await.unwrap();

        let ids = |users: &[User]| users.iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids(&paged), vec![1, 2]);
        assert_eq!(ids(&paged), ids(&flat));
    }

    #[tokio::test]
    async fn test_empty_paged_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/applications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"count": 0, "next": null, "previous": null, "results": []}),
            ))
            .mount(&server)
            .await;

        let client = client_with_token(&server, &fresh_jwt()).await;
        let apps: Vec<serde_json::Value> = client.list("/applications/").await.unwrap();
        assert!(apps.is_empty());
    }
}
