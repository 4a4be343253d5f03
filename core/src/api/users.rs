//! User lookups and the friends/followers listings.

use super::{require, segment};
use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};
use crate::types::{http_date, UserListOptions};

impl<T: Transport> TwitterClient<T> {
    /// Extended information about `user` (ID or screen name).
    pub fn show_user(&self, user: &str, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserShow)?;
        let user = require(Operation::UserShow, "id", user)?;
        self.call(
            Call::get(
                Operation::UserShow,
                self.api_url(&format!("/users/show/{}", segment(user)), format),
            )
            .authenticated(),
        )
    }

    /// Extended information about the user registered with `email`.
    pub fn show_user_by_email(
        &self,
        email: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserShow)?;
        let email = require(Operation::UserShow, "email", email)?;
        let mut params = Params::new();
        params.push("email", email);
        self.call(
            Call::get(Operation::UserShow, self.api_url("/users/show", format))
                .authenticated()
                .with_params(params),
        )
    }

    /// Users currently featured on the site, with their statuses inline.
    pub fn featured_users(&self, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserFeatured)?;
        self.call(
            Call::get(
                Operation::UserFeatured,
                self.api_url("/statuses/featured", format),
            )
            .authenticated(),
        )
    }

    /// Friends who most recently updated, each with their current status.
    pub fn friends(
        &self,
        options: &UserListOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserFriends)?;
        let mut params = Params::new();
        params.push_opt("since", options.since.as_ref().map(http_date));
        push_listing(&mut params, options);
        self.call(
            Call::get(
                Operation::UserFriends,
                self.api_url("/statuses/friends", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Followers, each with their current status. `since` is not sent.
    pub fn followers(
        &self,
        options: &UserListOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserFollowers)?;
        let mut params = Params::new();
        push_listing(&mut params, options);
        self.call(
            Call::get(
                Operation::UserFollowers,
                self.api_url("/statuses/followers", format),
            )
            .authenticated()
            .with_params(params),
        )
    }
}

fn push_listing(params: &mut Params, options: &UserListOptions) {
    params
        .push_opt("id", options.id.as_deref())
        .push_opt("page", options.page)
        .push_opt("lite", options.lite.then_some("true"));
}
