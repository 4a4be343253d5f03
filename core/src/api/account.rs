//! Account settings of the authenticating user.

use super::require;
use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};
use crate::types::Device;

impl<T: Transport> TwitterClient<T> {
    /// Set the free-text location shown on the profile.
    pub fn update_location(
        &self,
        location: &str,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let operation = Operation::AccountUpdateLocation;
        let format = self.resolve(format, operation)?;
        let location = require(operation, "location", location)?;
        let mut params = Params::new();
        params.push("location", location);
        self.call(
            Call::get(operation, self.api_url("/account/update_location", format))
                .authenticated()
                .with_params(params),
        )
    }

    /// Choose where updates are delivered. [`Device::None`] turns IM and SMS
    /// delivery off. Sent as a GET with `device` in the query string.
    pub fn update_delivery_device(
        &self,
        device: Device,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let operation = Operation::AccountUpdateDeliveryDevice;
        let format = self.resolve(format, operation)?;
        let mut params = Params::new();
        params.push("device", device.as_str());
        self.call(
            Call::get(
                operation,
                self.api_url("/account/update_delivery_device", format),
            )
            .authenticated()
            .with_params(params),
        )
    }

    /// Remaining API requests for the current hour. Does not count against
    /// the limit.
    pub fn rate_limit_status(&self, format: Option<Format>) -> Result<Payload, ApiError> {
        let operation = Operation::AccountRateLimitStatus;
        let format = self.resolve(format, operation)?;
        self.call(
            Call::get(operation, self.api_url("/account/rate_limit_status", format))
                .authenticated(),
        )
    }

    /// Succeeds with the user's details when the configured credentials are
    /// accepted by the server.
    pub fn verify_credentials(&self, format: Option<Format>) -> Result<Payload, ApiError> {
        let operation = Operation::AccountVerifyCredentials;
        let format = self.resolve(format, operation)?;
        self.call(
            Call::get(
                operation,
                self.api_url("/account/verify_credentials", format),
            )
            .authenticated(),
        )
    }
}
