//! Per-client configuration: credentials, output defaults and the headers
//! that identify this library to the remote service.
//!
//! # Design
//! `ClientConfig` is built once with the `with_*` methods and then owned by a
//! single `TwitterClient`. Only the default format, the status length and the
//! credentials change afterwards, each through an explicit setter.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ApiError;
use crate::format::{Format, Operation};

pub const DEFAULT_API_BASE_URL: &str = "http://twitter.com";
pub const DEFAULT_SEARCH_BASE_URL: &str = "http://search.twitter.com";
pub const DEFAULT_MAX_STATUS_LENGTH: usize = 140;

pub const CLIENT_HEADER: &str = "X-Twitter-Client";
pub const CLIENT_VERSION_HEADER: &str = "X-Twitter-Client-Version";
pub const CLIENT_URL_HEADER: &str = "X-Twitter-Client-URL";

/// Name, version and URL sent with every request. The URL defaults to the
/// package's `repository` metadata and its header is left out while empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub version: String,
    pub url: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            url: env!("CARGO_PKG_REPOSITORY").to_string(),
        }
    }
}

impl ClientIdentity {
    /// Value for the `User-Agent` header.
    pub fn user_agent(&self) -> String {
        format!("{} v.{}", self.name, self.version)
    }

    fn headers(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (CLIENT_HEADER, self.name.as_str()),
            (CLIENT_VERSION_HEADER, self.version.as_str()),
            (CLIENT_URL_HEADER, self.url.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    username: Option<String>,
    password: Option<String>,
    default_format: Format,
    max_status_length: usize,
    identity: ClientIdentity,
    default_headers: Vec<(String, String)>,
    api_base_url: String,
    search_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            default_format: Format::Json,
            max_status_length: DEFAULT_MAX_STATUS_LENGTH,
            identity: ClientIdentity::default(),
            default_headers: Vec::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.set_credentials(username, password);
        self
    }

    /// Validated like [`ClientConfig::set_default_format`].
    pub fn with_default_format(mut self, format: &str) -> Result<Self, ApiError> {
        self.set_default_format(format)?;
        Ok(self)
    }

    pub fn with_max_status_length(mut self, length: usize) -> Self {
        self.max_status_length = length;
        self
    }

    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Extra headers sent with every request. The identity headers are merged
    /// over these and win on collision.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_search_base_url(mut self, url: &str) -> Self {
        self.search_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn set_username(&mut self, username: Option<&str>) {
        self.username = username.map(str::to_string);
    }

    pub fn set_password(&mut self, password: Option<&str>) {
        self.password = password.map(str::to_string);
    }

    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.set_username(Some(username));
        self.set_password(Some(password));
    }

    /// Change the format used when an operation is called without one.
    /// Only json, xml, rss and atom are accepted.
    pub fn set_default_format(&mut self, format: &str) -> Result<(), ApiError> {
        self.default_format = crate::format::resolve(
            Some(Format::parse(format)?),
            self.default_format,
            Operation::Allowed,
        )?;
        Ok(())
    }

    pub fn set_max_status_length(&mut self, length: usize) {
        self.max_status_length = length;
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn default_format(&self) -> Format {
        self.default_format
    }

    pub fn max_status_length(&self) -> usize {
        self.max_status_length
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn search_base_url(&self) -> &str {
        &self.search_base_url
    }

    /// Both username and password are set and non-empty.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// `Authorization` header value for HTTP basic authentication.
    pub fn basic_auth(&self) -> Option<String> {
        self.credentials()
            .map(|(user, pass)| format!("Basic {}", BASE64.encode(format!("{user}:{pass}"))))
    }

    /// Merge `extra` with the identity headers. The identity headers win on a
    /// case-insensitive name collision and replace the caller's value in
    /// place; the remaining identity headers are appended in order.
    pub fn headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut merged = extra.to_vec();
        for (name, value) in self.identity.headers() {
            match merged
                .iter_mut()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                Some(slot) => *slot = (name.to_string(), value.to_string()),
                None => merged.push((name.to_string(), value.to_string())),
            }
        }
        merged
    }
}
