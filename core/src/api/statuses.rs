//! Timelines and single statuses.

use super::require;
use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};
use crate::types::TimelineOptions;

impl<T: Transport> TwitterClient<T> {
    /// The 20 most recent statuses from non-protected users. No
    /// authentication needed.
    pub fn public_timeline(&self, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::PublicTimeline)?;
        self.call(Call::get(
            Operation::PublicTimeline,
            self.api_url("/statuses/public_timeline", format),
        ))
    }

    /// Statuses from the authenticating user and their friends.
    pub fn friends_timeline(
        &self,
        options: &TimelineOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::FriendsTimeline)?;
        let mut params = Params::new();
        options.push_all(&mut params);
        self.call(
            Call::get(
                Operation::FriendsTimeline,
                self.api_url("/statuses/friends_timeline", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Statuses posted by `user` (ID or screen name), or by the
    /// authenticating user when `None`.
    pub fn user_timeline(
        &self,
        user: Option<&str>,
        options: &TimelineOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::UserTimeline)?;
        let mut params = Params::new();
        params.push_opt("id", user);
        options.push_all(&mut params);
        self.call(
            Call::get(
                Operation::UserTimeline,
                self.api_url("/statuses/user_timeline", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    pub fn show_status(&self, status_id: u64, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::StatusShow)?;
        self.call(
            Call::get(
                Operation::StatusShow,
                self.api_url(&format!("/statuses/show/{status_id}"), format),
            )
            .authenticated(),
        )
    }

    /// Post a status update. Text longer than the configured maximum is cut
    /// to that many characters before it is sent.
    pub fn update_status(&self, status: &str, format: Option<Format>) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::StatusUpdate)?;
        let status = require(Operation::StatusUpdate, "status", status)?;
        let status: String = status
            .chars()
            .take(self.config().max_status_length())
            .collect();

        let mut params = Params::new();
        params.push("status", status);
        self.call(
            Call::post(
                Operation::StatusUpdate,
                self.api_url("/statuses/update", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Destroy a status authored by the authenticating user.
    pub fn destroy_status(
        &self,
        status_id: u64,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::StatusDestroy)?;
        self.call(
            Call::get(
                Operation::StatusDestroy,
                self.api_url(&format!("/statuses/destroy/{status_id}"), format),
            )
            .authenticated(),
        )
    }

    /// The most recent @replies to the authenticating user. `count` is not
    /// sent.
    pub fn replies(
        &self,
        options: &TimelineOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::StatusReplies)?;
        let mut params = Params::new();
        options.push_filters(&mut params);
        self.call(
            Call::get(
                Operation::StatusReplies,
                self.api_url("/statuses/replies", format),
            )
            .authenticated()
            .with_params(params),
        )
    }
}
