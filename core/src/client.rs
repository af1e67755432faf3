//! Async client for the Roomping API.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig`, the target `Environment`,
//! and a shared `reqwest::Client`. Every call goes through one pipeline:
//!
//! 1. `build_request` resolves a `RequestSpec` into an `HttpRequest`
//!    (absolute URL, standard headers, JSON body).
//! 2. The request is sent with `reqwest` and read back into an
//!    `HttpResponse`.
//! 3. `parse_response` classifies the status and parses the body.
//!
//! Steps 1 and 3 are pure, so they are unit tested without a server. Calls
//! share no mutable state; concurrent calls on one client are independent.
//! Nothing is retried.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{ClientConfig, Environment};
use crate::error::{ApiError, Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestSpec};
use crate::query::Query;

pub const CLIENT_NAME: &str = "roomping";
pub const API_KEY_HEADER: &str = "X-Roomping-API-Key";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ApiClient {
    environment: Environment,
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(environment: impl Into<Environment>, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(environment, config, http))
    }

    /// Use a caller-configured `reqwest::Client` (proxies, TLS roots, timeouts).
    pub fn with_http_client(
        environment: impl Into<Environment>,
        config: ClientConfig,
        http: reqwest::Client,
    ) -> Self {
        Self {
            environment: environment.into(),
            config,
            http,
        }
    }

    pub fn name(&self) -> &'static str {
        CLIENT_NAME
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `endpoint`: `{protocol}://{host}/v{version}{endpoint}`.
    ///
    /// A missing leading slash on `endpoint` is added; nothing else is
    /// normalized.
    pub fn build_api_url(&self, endpoint: &str) -> String {
        let host = self.config.resolve_host(&self.environment);
        let slash = if endpoint.starts_with('/') { "" } else { "/" };
        format!(
            "{}://{host}/v{}{slash}{endpoint}",
            self.config.resolve_protocol(),
            self.config.api_version
        )
    }

    /// Resolve `spec` into wire data. Caller headers are dropped in favour
    /// of the standard JSON and API-key headers.
    pub fn build_request(&self, spec: RequestSpec) -> Result<HttpRequest> {
        let body = spec
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(Error::Serialization)?;

        Ok(HttpRequest {
            method: spec.method,
            url: self.build_api_url(&spec.endpoint),
            query: spec.query.to_pairs(),
            headers: self.standard_headers(),
            body,
        })
    }

    /// Classify `response` to `request`. A 2xx yields the parsed body; any
    /// other status yields `Error::Api`.
    pub fn parse_response(&self, request: &HttpRequest, response: HttpResponse) -> Result<Value> {
        let success = response.is_success();
        let body = parse_body(&response.body);
        if success {
            return Ok(body);
        }
        Err(ApiError {
            code: response.status,
            url: request.url.clone(),
            meta: body,
        }
        .into())
    }

    /// Execute `spec` and decode a successful body into `T`.
    pub async fn http_request<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let request = self.build_request(spec)?;
        let response = self.send(&request).await?;
        let body = self.parse_response(&request, response).inspect_err(|err| {
            debug!(method = %request.method, url = %request.url, error = %err, "request failed");
        })?;
        serde_json::from_value(body).map_err(Error::Deserialization)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: Option<Query>) -> Result<T> {
        let spec = RequestSpec::new(HttpMethod::Get, endpoint).with_query(query.unwrap_or_default());
        self.http_request(spec).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, query: Option<Query>, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = with_json_body(RequestSpec::new(HttpMethod::Post, endpoint), query, body)?;
        self.http_request(spec).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, query: Option<Query>, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let spec = with_json_body(RequestSpec::new(HttpMethod::Put, endpoint), query, body)?;
        self.http_request(spec).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, query: Option<Query>) -> Result<T> {
        let spec = RequestSpec::new(HttpMethod::Delete, endpoint).with_query(query.unwrap_or_default());
        self.http_request(spec).await
    }

    /// `GET /users/{id}`.
    pub async fn find_user(&self, id: impl fmt::Display) -> Result<Value> {
        self.http_request(user_lookup(id)).await
    }

    /// `GET /users` with `filter` forwarded as the query string.
    pub async fn find_users(&self, filter: Query) -> Result<Vec<Value>> {
        self.http_request(users_lookup(filter)).await
    }

    fn standard_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            (API_KEY_HEADER.to_string(), self.config.api_key.clone()),
        ]
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        if self.config.debug {
            info!(method = %request.method, url = %request.url, query = ?request.query, "sending request");
        } else {
            debug!(method = %request.method, url = %request.url, "sending request");
        }

        let mut builder = self
            .http
            .request(request.method.into(), &request.url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.inspect_err(|err| {
            debug!(method = %request.method, url = %request.url, error = %err, "transport failure");
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_string(), value)
            })
            .collect();
        let body = response.text().await?;

        if self.config.debug {
            info!(url = %request.url, status, body = %body, "received response");
        } else {
            debug!(url = %request.url, status, "received response");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn user_lookup(id: impl fmt::Display) -> RequestSpec {
    RequestSpec::new(HttpMethod::Get, format!("/users/{id}"))
}

fn users_lookup(filter: Query) -> RequestSpec {
    RequestSpec::new(HttpMethod::Get, "/users").with_query(filter)
}

fn with_json_body<B>(spec: RequestSpec, query: Option<Query>, body: Option<&B>) -> Result<RequestSpec>
where
    B: Serialize + ?Sized,
{
    let spec = spec.with_query(query.unwrap_or_default());
    match body {
        Some(body) => {
            let value = serde_json::to_value(body).map_err(Error::Serialization)?;
            Ok(spec.with_body(value))
        }
        None => Ok(spec),
    }
}

/// Empty bodies parse as `null`; bodies that are not JSON are kept as a
/// JSON string.
fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
