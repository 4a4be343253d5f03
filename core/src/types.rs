//! Argument types for the operation wrappers.
//!
//! Identifiers, pages and counts are integers so the numeric coercion the
//! remote API expects is enforced at compile time. Every optional field left
//! as `None` is omitted from the request entirely.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::http::Params;

/// Render `when` as an HTTP date, e.g. `Tue, 27 Mar 2007 22:55:48 GMT`.
pub fn http_date(when: &DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Paging and filtering for timelines, replies and direct message lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Only entries created after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only entries with an id greater than this one.
    pub since_id: Option<u64>,
    pub page: Option<u32>,
    /// Number of entries to return; the API caps it at 200. Only the
    /// friends and user timelines send it.
    pub count: Option<u32>,
}

impl TimelineOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub(crate) fn push_filters(&self, params: &mut Params) {
        params
            .push_opt("since", self.since.as_ref().map(http_date))
            .push_opt("since_id", self.since_id)
            .push_opt("page", self.page);
    }

    pub(crate) fn push_all(&self, params: &mut Params) {
        self.push_filters(params);
        params.push_opt("count", self.count);
    }
}

/// Options for the friends and followers listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListOptions {
    /// ID or screen name of the user whose list is requested; the
    /// authenticating user when `None`.
    pub id: Option<String>,
    /// Friends listing only.
    pub since: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    /// Leave out the inline current status. Sent only when `true`.
    pub lite: bool,
}

/// Search parameters in addition to the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// ISO 639-1 language code.
    pub lang: Option<String>,
    /// Results per page, at most 100.
    pub rpp: Option<u32>,
    pub since_id: Option<u64>,
    /// `latitude,longitude,radius` with the radius in `mi` or `km`.
    pub geocode: Option<String>,
    /// Prefix each result with `<user>:`. Sent only when `true`.
    pub show_user: bool,
    /// Any other parameter, passed through verbatim.
    pub extra: Vec<(String, String)>,
}

impl SearchOptions {
    pub(crate) fn push_into(&self, params: &mut Params) {
        params
            .push_opt("lang", self.lang.as_deref())
            .push_opt("rpp", self.rpp)
            .push_opt("since_id", self.since_id)
            .push_opt("geocode", self.geocode.as_deref())
            .push_opt("show_user", self.show_user.then_some("true"));
        for (name, value) in &self.extra {
            params.push(name, value);
        }
    }
}

/// Where the remote service delivers updates for the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Im,
    Sms,
    /// Disable IM and SMS delivery.
    None,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Im => "im",
            Device::Sms => "sms",
            Device::None => "none",
        }
    }
}

impl FromStr for Device {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "im" => Ok(Device::Im),
            "sms" => Ok(Device::Sms),
            "none" => Ok(Device::None),
            _ => Err(ApiError::InvalidArgument {
                parameter: "device",
                value: s.to_string(),
                expected: "im, sms, none",
            }),
        }
    }
}
