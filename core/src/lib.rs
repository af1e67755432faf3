//! Async client for the Roomping JSON/HTTP API.
//!
//! # Overview
//! Resolves an environment-specific base URL, attaches the JSON content type
//! and API-key headers, issues GET/POST/PUT/DELETE requests, and turns every
//! non-2xx response into a single `ApiError` shape.
//!
//! # Design
//! - `ApiClient` owns an immutable `ClientConfig`; calls take `&self` and are
//!   independent of each other.
//! - Request building and response classification are pure functions over
//!   `HttpRequest` / `HttpResponse`; only `ApiClient::http_request` does I/O.
//! - Failures are either `Error::Api` (server answered with a bad status) or
//!   `Error::Transport` (no answer). Nothing is retried.
//!
//! ```no_run
//! use roomping_core::{ApiClient, ClientConfig, Query};
//!
//! # async fn demo() -> roomping_core::Result<()> {
//! let client = ApiClient::new("production", ClientConfig::default().with_api_key("key"))?;
//! let user = client.find_user(42).await?;
//! let locals = client.find_users(Query::new().with("city", "NYC")).await?;
//! # let _ = (user, locals);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;

pub use client::{ApiClient, API_KEY_HEADER, CLIENT_NAME};
pub use config::{ApiVersion, ClientConfig, Environment};
pub use error::{ApiError, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestSpec};
pub use query::{Query, QueryError, QueryValue};
