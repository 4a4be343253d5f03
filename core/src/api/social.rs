//! Friendships, favorites, notifications and blocks.

use super::{require, segment};
use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};

impl<T: Transport> TwitterClient<T> {
    /// Authenticated GET of `{path}/{id}.{format}`.
    fn on_target(
        &self,
        operation: Operation,
        path: &str,
        id: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, operation)?;
        let id = require(operation, "id", id)?;
        self.call(
            Call::get(
                operation,
                self.api_url(&format!("{path}/{}", segment(id)), format),
            )
            .authenticated(),
        )
    }

    /// Befriend `user` (ID or screen name).
    pub fn create_friendship(&self, user: &str, format: Option<Format>) -> Result<Payload, ApiError> {
        self.on_target(Operation::FriendshipCreate, "/friendships/create", user, format)
    }

    pub fn destroy_friendship(
        &self,
        user: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        self.on_target(Operation::FriendshipDestroy, "/friendships/destroy", user, format)
    }

    /// Whether `user_a` follows `user_b`.
    pub fn friendship_exists(
        &self,
        user_a: &str,
        user_b: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let operation = Operation::FriendshipExist;
        let format = self.resolve(format, operation)?;
        let user_a = require(operation, "user_a", user_a)?;
        let user_b = require(operation, "user_b", user_b)?;
        let mut params = Params::new();
        params.push("user_a", user_a).push("user_b", user_b);
        self.call(
            Call::get(operation, self.api_url("/friendships/exists", format))
                .authenticated()
                .with_params(params),
        )
    }

    /// Favorite statuses of the authenticating user.
    pub fn favorites(&self, page: Option<u32>, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::Favorites)?;
        let mut params = Params::new();
        params.push_opt("page", page);
        self.call(
            Call::get(Operation::Favorites, self.api_url("/favorites", format))
                .authenticated()
                .with_params(params),
        )
    }

    /// Favorite statuses of `user`. No authentication needed.
    pub fn favorites_by_user(
        &self,
        user: &str,
        page: Option<u32>,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::Favorites)?;
        let user = require(Operation::Favorites, "id", user)?;
        let mut params = Params::new();
        params.push_opt("page", page);
        self.call(
            Call::get(
                Operation::Favorites,
                self.api_url(&format!("/favorites/{}", segment(user)), format),
            )
            .with_params(params),
        )
    }

    pub fn create_favorite(
        &self,
        status_id: u64,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        self.on_target(
            Operation::FavoritesCreate,
            "/favorites/create",
            &status_id.to_string(),
            format,
        )
    }

    pub fn destroy_favorite(
        &self,
        status_id: u64,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        self.on_target(
            Operation::FavoritesDestroy,
            "/favorites/destroy",
            &status_id.to_string(),
            format,
        )
    }

    /// Enable notifications for updates from `user`.
    pub fn follow_notifications(
        &self,
        user: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        self.on_target(Operation::NotificationFollow, "/notifications/follow", user, format)
    }

    pub fn leave_notifications(
        &self,
        user: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        self.on_target(Operation::NotificationLeave, "/notifications/leave", user, format)
    }

    pub fn create_block(&self, user: &str, format: Option<Format>) -> Result<Payload, ApiError> {
        self.on_target(Operation::BlocksCreate, "/blocks/create", user, format)
    }

    pub fn destroy_block(&self, user: &str, format: Option<Format>) -> Result<Payload, ApiError> {
        self.on_target(Operation::BlocksDestroy, "/blocks/destroy", user, format)
    }
}
