//! Client SDK for the RBAC administration backend.
//!
//! Wiring order mirrors the request path: a [`session::TokenStore`] holds
//! the token pair, a [`session::SessionManager`] owns login and the
//! single-flight refresh, the [`http::ApiClient`] attaches bearer tokens
//! and performs the one-shot 401 retry, and the [`gateways`] expose CRUD
//! per entity type on top of it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rbac_admin_client::{config, gateways::UsersGateway, http::ApiClient, session::FileTokenStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = config::load()?;
//! let store = Arc::new(FileTokenStore::new(&config.token_path));
//! let (session, client) = ApiClient::from_config(&config, store)?;
//!
//! session.login("admin@example.com", "hunter2").await?;
//! let users = UsersGateway::new(Arc::new(client)).list().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod gateways;
pub mod http;
pub mod models;
pub mod session;

pub use errors::ApiError;
