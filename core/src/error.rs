//! Error types for the client.
//!
//! # Design
//! Every variant is raised at exactly one gate of the dispatch pipeline or
//! by an operation's argument checks. Local rejections (format, parameters,
//! verb, credentials) happen before any transport call; `RemoteApi` carries
//! what the server said verbatim.

use thiserror::Error;

use crate::format::{Format, Operation};
use crate::http::HttpMethod;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested (or default) format is not offered by the operation.
    #[error("{operation}: allow {} formats. Invalid format: {format}", join_formats(.allowed))]
    UnsupportedFormat {
        operation: Operation,
        format: String,
        allowed: &'static [Format],
    },

    /// A required argument was empty.
    #[error("{operation}: missing required parameter `{parameter}`")]
    MissingParameter {
        operation: Operation,
        parameter: &'static str,
    },

    /// The call was configured with a verb other than GET, POST or PUT.
    #[error("method allowed are GET, POST and PUT. Invalid method: {0}")]
    InvalidVerb(HttpMethod),

    /// The operation needs credentials and none are configured.
    #[error("the URL {url} needs authentication")]
    AuthRequired { url: String },

    /// An argument is outside its permitted set of values.
    #[error("wrong {parameter} `{value}` specified, expected one of: {expected}")]
    InvalidArgument {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The server answered with a non-success status. `url` is the endpoint
    /// without the query string, as in [`ApiError::AuthRequired`].
    #[error("the given URL ({url}) returns an error ({status}: {message})")]
    RemoteApi {
        url: String,
        status: u16,
        message: String,
    },

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// An `.xml` response body was not well-formed.
    #[error("XML decoding failed: {0}")]
    Xml(String),

    /// The feed decoder rejected an `.rss` or `.atom` body.
    #[error("feed decoding failed: {0}")]
    Feed(String),
}

fn join_formats(formats: &[Format]) -> String {
    formats
        .iter()
        .map(|format| format.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
