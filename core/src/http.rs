//! HTTP wire types for the Roomping client.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe one round-trip as plain data.
//! `ApiClient::build_request` produces the former and
//! `ApiClient::parse_response` consumes the latter without touching the
//! network, so URL resolution, header injection, and status classification
//! are deterministic and testable on their own. Only `ApiClient::http_request`
//! moves these values over a socket.
//!
//! `RequestSpec` is the caller's description of a call before the client has
//! resolved it against its configuration.

use std::fmt;

use serde_json::Value;

use crate::query::Query;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single API call as the caller describes it.
///
/// `endpoint` is relative to the versioned API root, with or without a
/// leading slash. Any `headers` set here are discarded: the client always
/// sends exactly its standard JSON and API-key headers.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub endpoint: String,
    pub query: Query,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Query::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully resolved HTTP request described as plain data.
///
/// `url` is absolute and carries no query string; the encoded query lives in
/// `query` so the transport can append it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Response headers as received. `ApiClient::parse_response` ignores
    /// them; they are kept for callers that run their own transport between
    /// `build_request` and `parse_response`.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Success is any status in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
