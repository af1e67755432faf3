//! Client configuration.
//!
//! # Design
//! `ClientConfig` is a plain value handed to `ApiClient` at construction and
//! never mutated afterwards. It deserializes from the camelCase keys host
//! applications already use (`apiKey`, `apiVersion`, ...), and still accepts
//! the legacy `version` key for the API version (`apiVersion` wins when both
//! are set). Missing, `null`, and empty values fall back to their defaults.
//!
//! `Environment` is a separate constructor argument rather than a config
//! field. Converting a string into it is total: unknown names become
//! `Environment::Other`, which resolves to the development host.

use std::fmt;

use serde::Deserialize;

pub const PRODUCTION_HOST: &str = "api.roomping.com";
pub const TEST_HOST: &str = "api-test.roomping.com";
pub const DEVELOPMENT_HOST: &str = "api-dev.roomping.com";
pub const DEFAULT_PROTOCOL: &str = "https";

/// Named deployment target used to pick a default host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Testing,
    #[default]
    Development,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Testing => "testing",
            Environment::Development => "development",
            Environment::Other(name) => name,
        }
    }

    /// Host used when the config does not name one explicitly.
    pub fn default_host(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_HOST,
            Environment::Staging | Environment::Testing => TEST_HOST,
            Environment::Development | Environment::Other(_) => DEVELOPMENT_HOST,
        }
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        match name {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            "testing" => Environment::Testing,
            "development" | "" => Environment::Development,
            other => Environment::Other(other.to_string()),
        }
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Environment::from(name.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `v{version}` path segment. Built from a number or a string and
/// rendered verbatim; an empty string or zero means the default, `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(String);

impl ApiVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_text(text: String) -> Self {
        if text.is_empty() {
            Self::default()
        } else {
            ApiVersion(text)
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion("1".to_string())
    }
}

impl From<u32> for ApiVersion {
    fn from(version: u32) -> Self {
        if version == 0 {
            Self::default()
        } else {
            ApiVersion(version.to_string())
        }
    }
}

impl From<&str> for ApiVersion {
    fn from(version: &str) -> Self {
        ApiVersion::from_text(version.to_string())
    }
}

impl From<String> for ApiVersion {
    fn from(version: String) -> Self {
        ApiVersion::from_text(version)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A version as written in a config object: any JSON number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawApiVersion {
    Number(serde_json::Number),
    Text(String),
}

impl RawApiVersion {
    /// Zero and the empty string count as unset.
    fn into_version(self) -> Option<ApiVersion> {
        match self {
            RawApiVersion::Number(n) if n.as_f64() == Some(0.0) => None,
            RawApiVersion::Number(n) => Some(ApiVersion(n.to_string())),
            RawApiVersion::Text(s) if s.is_empty() => None,
            RawApiVersion::Text(s) => Some(ApiVersion(s)),
        }
    }
}

/// Config object as host applications write it. Every key may be absent or
/// `null`; `apiVersion` and the legacy `version` are read independently.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    api_version: Option<RawApiVersion>,
    #[serde(default)]
    version: Option<RawApiVersion>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    debug: Option<bool>,
}

impl From<RawClientConfig> for ClientConfig {
    fn from(raw: RawClientConfig) -> Self {
        let api_version = raw
            .api_version
            .and_then(RawApiVersion::into_version)
            .or_else(|| raw.version.and_then(RawApiVersion::into_version))
            .unwrap_or_default();
        Self {
            api_key: raw.api_key.unwrap_or_default(),
            api_version,
            host: raw.host.filter(|host| !host.is_empty()),
            protocol: raw
                .protocol
                .filter(|protocol| !protocol.is_empty())
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            debug: raw.debug.unwrap_or(false),
        }
    }
}

/// Options recognised by `ApiClient`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawClientConfig")]
pub struct ClientConfig {
    /// Sent as `X-Roomping-API-Key` on every request. May be empty.
    pub api_key: String,
    pub api_version: ApiVersion,
    /// Overrides environment-based host selection. Empty means unset.
    pub host: Option<String>,
    /// URL scheme. Empty means `https`.
    pub protocol: String,
    /// Raises per-request logging from `debug` to `info` and includes query
    /// and response bodies.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_version: ApiVersion::default(),
            host: None,
            protocol: DEFAULT_PROTOCOL.to_string(),
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<ApiVersion>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The explicit host if one is set, otherwise the environment's default.
    pub fn resolve_host<'a>(&'a self, environment: &Environment) -> &'a str {
        match self.host.as_deref() {
            Some(host) if !host.is_empty() => host,
            _ => environment.default_host(),
        }
    }

    /// The configured scheme, or `https` when it is empty.
    pub fn resolve_protocol(&self) -> &str {
        if self.protocol.is_empty() {
            DEFAULT_PROTOCOL
        } else {
            &self.protocol
        }
    }
}
