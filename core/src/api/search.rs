//! Search, served from its own host.
//!
//! The query language supports phrases (`"happy hour"`), `OR`, exclusion
//! (`beer -root`), hashtags, `from:`/`to:`/`@` user filters,
//! `since:`/`until:` dates, `near:`/`within:` places, attitudes (`:)`,
//! `:(`, `?`) and `filter:links`.

use crate::client::TwitterClient;
use crate::dispatch::{Call, Payload};
use crate::error::ApiError;
use crate::format::{Format, Operation};
use crate::http::{Params, Transport};
use crate::types::SearchOptions;

impl<T: Transport> TwitterClient<T> {
    /// Search all public statuses. `query` may be empty as long as `options`
    /// carries at least one parameter.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        format: Option<Format>,
    ) -> Result<Payload, ApiError> {
        let format = self.resolve(format, Operation::Search)?;
        let mut params = Params::new();
        if !query.trim().is_empty() {
            params.push("q", query);
        }
        options.push_into(&mut params);
        if params.is_empty() {
            return Err(ApiError::MissingParameter {
                operation: Operation::Search,
                parameter: "q",
            });
        }
        self.call(
            Call::get(Operation::Search, self.search_url("/search", format)).with_params(params),
        )
    }
}
