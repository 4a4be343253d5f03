//! The request pipeline every operation goes through.
//!
//! # Design
//! `dispatch` is a one-shot pipeline with a hard gate at each step:
//! verb check, credential check, header assembly, transport call, status
//! classification, then decoding by URL suffix. The first three steps live in
//! [`build_request`], which is pure, so every local rejection happens before
//! the transport is touched. There is no retry and no state kept between
//! calls.

use tracing::{debug, instrument, trace, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::feed::{Feed, FeedDecoder};
use crate::format::Operation;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Params, Transport};
use crate::xml::XmlDocument;

/// One API call as described by an operation wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    /// Absolute URL including the format suffix, without query string.
    pub url: String,
    pub method: HttpMethod,
    pub requires_auth: bool,
    pub params: Params,
}

impl Call {
    pub fn new(operation: Operation, method: HttpMethod, url: String) -> Self {
        Self {
            operation,
            url,
            method,
            requires_auth: false,
            params: Params::new(),
        }
    }

    pub fn get(operation: Operation, url: String) -> Self {
        Self::new(operation, HttpMethod::Get, url)
    }

    pub fn post(operation: Operation, url: String) -> Self {
        Self::new(operation, HttpMethod::Post, url)
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// A decoded response body.
///
/// JSON bodies are not parsed: anything that is not `.xml`, `.rss` or
/// `.atom` comes back as [`Payload::Text`] and callers deserialize it
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Xml(XmlDocument),
    Feed(Feed),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            Payload::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_feed(&self) -> Option<&Feed> {
        match self {
            Payload::Feed(feed) => Some(feed),
            _ => None,
        }
    }
}

/// Validate `call` and turn it into the request handed to the transport.
pub fn build_request(config: &ClientConfig, call: &Call) -> Result<HttpRequest, ApiError> {
    if !matches!(call.method, HttpMethod::Get | HttpMethod::Post | HttpMethod::Put) {
        return Err(ApiError::InvalidVerb(call.method));
    }

    if call.requires_auth && !config.has_credentials() {
        return Err(ApiError::AuthRequired {
            url: call.url.clone(),
        });
    }

    let mut headers = config.headers(config.default_headers());
    headers.push(("User-Agent".to_string(), config.identity().user_agent()));
    if let Some(authorization) = config.basic_auth() {
        headers.push(("Authorization".to_string(), authorization));
    }

    let (url, body) = if call.method.has_body() {
        headers.push((
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        ));
        (call.url.clone(), Some(call.params.encode()))
    } else if call.params.is_empty() {
        (call.url.clone(), None)
    } else {
        (format!("{}?{}", call.url, call.params.encode()), None)
    };

    Ok(HttpRequest {
        method: call.method,
        url,
        headers,
        body,
    })
}

/// Run `call` through the full pipeline.
#[instrument(level = "debug", skip_all, fields(operation = %call.operation, method = %call.method))]
pub fn dispatch<T: Transport + ?Sized>(
    config: &ClientConfig,
    transport: &T,
    feed_decoder: Option<&dyn FeedDecoder>,
    call: Call,
) -> Result<Payload, ApiError> {
    let request = build_request(config, &call)?;
    debug!(url = %request.url, "sending request");

    let response = transport.send(&request)?;
    debug!(status = response.status, "received response");

    check_status(&call.url, &response)?;
    decode_by_suffix(&request.url, &response.body, feed_decoder)
}

/// Map a non-success status to `ApiError::RemoteApi`.
fn check_status(url: &str, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(url, status = response.status, reason = %response.reason, "remote API error");
    Err(ApiError::RemoteApi {
        url: url.to_string(),
        status: response.status,
        message: response.reason.clone(),
    })
}

/// Trailing extension of the URL's last path segment, lowercased. Query
/// string and fragment are ignored.
fn suffix(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
}

/// Decode `body` according to the suffix of the URL it was fetched from.
///
/// `.xml` is parsed into an [`XmlDocument`]; `.rss` and `.atom` go through
/// `feed_decoder` when one is configured; everything else, and feeds without
/// a decoder, is returned as text.
pub fn decode_by_suffix(
    url: &str,
    body: &[u8],
    feed_decoder: Option<&dyn FeedDecoder>,
) -> Result<Payload, ApiError> {
    match (suffix(url).as_deref(), feed_decoder) {
        (Some("xml"), _) => {
            trace!("decoding XML document");
            XmlDocument::parse(body).map(Payload::Xml)
        }
        (Some("rss" | "atom"), Some(decoder)) => {
            trace!("decoding feed");
            decoder.decode(body, url).map(Payload::Feed)
        }
        _ => Ok(Payload::Text(String::from_utf8_lossy(body).into_owned())),
    }
}
