//! Response formats and the per-operation format policy.
//!
//! The policy is a static `match`; nothing here is mutable. The pseudo
//! operation [`Operation::Allowed`] holds the global set used to validate a
//! new default format.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::ApiError;

/// Output encoding token. Selects both the URL suffix and the decoder.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
    Rss,
    Atom,
}

const ALL: &[Format] = &[Format::Json, Format::Xml, Format::Rss, Format::Atom];
const JSON_XML: &[Format] = &[Format::Json, Format::Xml];
const JSON_ATOM: &[Format] = &[Format::Json, Format::Atom];

impl Format {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// The URL suffix, including the leading dot.
    pub fn extension(&self) -> String {
        format!(".{}", self.as_str())
    }

    /// Parse a textual token. Unknown tokens are reported against the global
    /// `allowed` set, the same way a rejected default format is.
    pub fn parse(token: &str) -> Result<Self, ApiError> {
        token.parse().map_err(|_| ApiError::UnsupportedFormat {
            operation: Operation::Allowed,
            format: token.to_string(),
            allowed: Operation::Allowed.formats(),
        })
    }
}

/// Key of one entry in the format policy.
///
/// Several client methods share a key: `favorites` and `favorites_by_user`
/// both use [`Operation::Favorites`], `show_user` and `show_user_by_email`
/// both use [`Operation::UserShow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Allowed,
    Search,

    DirectMessage,
    DirectMessageSent,
    DirectMessageCreate,
    DirectMessageDestroy,

    FriendshipDestroy,
    FriendshipCreate,
    FriendshipExist,

    AccountUpdateLocation,
    AccountUpdateDeliveryDevice,
    AccountRateLimitStatus,
    AccountVerifyCredentials,

    Favorites,
    FavoritesCreate,
    FavoritesDestroy,

    NotificationFollow,
    NotificationLeave,

    BlocksCreate,
    BlocksDestroy,

    PublicTimeline,
    FriendsTimeline,
    UserTimeline,

    StatusShow,
    StatusUpdate,
    StatusDestroy,
    StatusReplies,

    UserFriends,
    UserFollowers,
    UserFeatured,
    UserShow,
}

impl Operation {
    /// Formats the remote API offers for this operation.
    pub fn formats(self) -> &'static [Format] {
        use Operation::*;
        match self {
            Allowed => ALL,
            Search => JSON_ATOM,
            DirectMessage | Favorites | PublicTimeline | FriendsTimeline | UserTimeline
            | StatusReplies => ALL,
            DirectMessageSent
            | DirectMessageCreate
            | DirectMessageDestroy
            | FriendshipDestroy
            | FriendshipCreate
            | FriendshipExist
            | AccountUpdateLocation
            | AccountUpdateDeliveryDevice
            | AccountRateLimitStatus
            | AccountVerifyCredentials
            | FavoritesCreate
            | FavoritesDestroy
            | NotificationFollow
            | NotificationLeave
            | BlocksCreate
            | BlocksDestroy
            | StatusShow
            | StatusUpdate
            | StatusDestroy
            | UserFriends
            | UserFollowers
            | UserFeatured
            | UserShow => JSON_XML,
        }
    }

    pub fn allows(self, format: Format) -> bool {
        self.formats().contains(&format)
    }
}

/// Substitute `default` for an unset request, then check it against the
/// operation's policy.
pub fn resolve(
    requested: Option<Format>,
    default: Format,
    operation: Operation,
) -> Result<Format, ApiError> {
    let format = requested.unwrap_or(default);
    if operation.allows(format) {
        Ok(format)
    } else {
        Err(ApiError::UnsupportedFormat {
            operation,
            format: format.to_string(),
            allowed: operation.formats(),
        })
    }
}
