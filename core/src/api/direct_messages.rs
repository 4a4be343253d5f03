//! Direct messages.

use super::require;
use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};
use crate::types::TimelineOptions;

impl<T: Transport> TwitterClient<T> {
    /// Messages received by the authenticating user. `count` is not sent.
    pub fn direct_messages(
        &self,
        options: &TimelineOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::DirectMessage)?;
        let mut params = Params::new();
        options.push_filters(&mut params);
        self.call(
            Call::get(
                Operation::DirectMessage,
                self.api_url("/direct_messages", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Messages sent by the authenticating user. `count` is not sent.
    pub fn sent_direct_messages(
        &self,
        options: &TimelineOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::DirectMessageSent)?;
        let mut params = Params::new();
        options.push_filters(&mut params);
        self.call(
            Call::get(
                Operation::DirectMessageSent,
                self.api_url("/direct_messages/sent", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Send `text` to `user` (ID or screen name).
    pub fn send_direct_message(
        &self,
        user: &str,
        text: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let operation = Operation::DirectMessageCreate;
        let format = self.resolve(format, operation)?;
        let user = require(operation, "user", user)?;
        let text = require(operation, "text", text)?;
        let mut params = Params::new();
        params.push("user", user).push("text", text);
        self.call(
            Call::post(operation, self.api_url("/direct_messages/new", format))
                .authenticated()
                .with_params(params),
        )
    }

    /// Destroy a message received by the authenticating user.
    pub fn destroy_direct_message(
        &self,
        message_id: u64,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::DirectMessageDestroy)?;
        self.call(
            Call::get(
                Operation::DirectMessageDestroy,
                self.api_url(&format!("/direct_messages/destroy/{message_id}"), format),
            )
            .authenticated(),
        )
    }
}
