//! Operation wrappers, grouped by resource family.
//!
//! Every wrapper follows the same shape: resolve the format against its
//! policy key, check required arguments, build the URL and parameters, then
//! hand a [`Call`](crate::dispatch::Call) to the dispatcher. Several
//! state-changing operations use GET because that is what the remote API
//! expects for them.

mod account;
mod direct_messages;
mod search;
mod social;
mod statuses;
mod users;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::format::Operation;

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Reject an empty (or blank) required argument.
fn require<'a>(
    operation: Operation,
    parameter: &'static str,
    value: &'a str,
) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingParameter {
            operation,
            parameter,
        });
    }
    Ok(value)
}

/// A user id or screen name placed in the URL path.
fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}
