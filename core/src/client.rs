//! The client handle every operation hangs off.
//!
//! # Design
//! `TwitterClient` owns its `ClientConfig`, the transport and an optional feed
//! decoder. Operations take `&self`; the setters take `&mut self`, so a
//! configuration change can never interleave with a call on the same
//! instance. The operations themselves live in the `api` module, one file
//! per resource family.

use crate::config::ClientConfig;
use crate::dispatch::{dispatch, Call, Payload};
use crate::error::ApiError;
use crate::feed::FeedDecoder;
use crate::format::{self, Format, Operation};
use crate::http::Transport;

pub struct TwitterClient<T> {
    config: ClientConfig,
    transport: T,
    feed_decoder: Option<Box<dyn FeedDecoder>>,
}

impl<T: Transport> TwitterClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            feed_decoder: None,
        }
    }

    /// Decode `.rss` and `.atom` responses with `decoder` instead of
    /// returning them as text.
    pub fn with_feed_decoder(mut self, decoder: impl FeedDecoder + 'static) -> Self {
        self.feed_decoder = Some(Box::new(decoder));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_default_format(&mut self, format: &str) -> Result<(), ApiError> {
        self.config.set_default_format(format)
    }

    /// Maximum number of characters kept from a status update.
    pub fn set_max_status_length(&mut self, length: usize) {
        self.config.set_max_status_length(length);
    }

    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.config.set_credentials(username, password);
    }

    pub fn set_username(&mut self, username: Option<&str>) {
        self.config.set_username(username);
    }

    pub fn set_password(&mut self, password: Option<&str>) {
        self.config.set_password(password);
    }

    /// `extra` merged with the client identification headers, which win on
    /// collision.
    pub fn headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        self.config.headers(extra)
    }

    pub(crate) fn resolve(
        &self,
        requested: Option<Format>,
        operation: Operation,
    ) -> Result<Format, ApiError> {
        format::resolve(requested, self.config.default_format(), operation)
    }

    /// `{api_base_url}{path}.{format}`
    pub(crate) fn api_url(&self, path: &str, format: Format) -> String {
        format!("{}{}{}", self.config.api_base_url(), path, format.extension())
    }

    pub(crate) fn search_url(&self, path: &str, format: Format) -> String {
        format!("{}{}{}", self.config.search_base_url(), path, format.extension())
    }

    pub(crate) fn call(&self, call: Call) -> Result<Payload, ApiError> {
        dispatch(
            &self.config,
            &self.transport,
            self.feed_decoder.as_deref(),
            call,
        )
    }
}
