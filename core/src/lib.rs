//! Synchronous client for the Twitter REST API (status updates, timelines,
//! direct messages, friendships, favorites, blocks, notifications, account
//! settings and search).
//!
//! # Overview
//! Every public operation on [`TwitterClient`] is a thin wrapper that picks a
//! URL, a verb, an auth requirement and a format policy, then funnels into one
//! dispatch pipeline: format validation, credential gate, header assembly,
//! the HTTP exchange through an injected [`Transport`], status
//! classification and decoding by URL suffix.
//!
//! # Design
//! - The transport is a trait; [`UreqTransport`] is the default
//!   implementation (feature `ureq`). Tests substitute recording doubles.
//! - `.xml` responses decode to [`XmlDocument`], `.rss`/`.atom` to [`Feed`]
//!   when a [`FeedDecoder`] is installed, and everything else, JSON
//!   included, to raw text.
//! - Configuration is an explicit [`ClientConfig`] owned by the client; the
//!   format policy is the only shared static.
//!
//! ```no_run
//! use twitter_core::{ClientConfig, Format, SyndicationDecoder, TwitterClient, UreqTransport};
//!
//! let config = ClientConfig::new().with_credentials("alice", "secret");
//! let client = TwitterClient::new(config, UreqTransport::new())
//!     .with_feed_decoder(SyndicationDecoder);
//! let posted = client.update_status("hello world", None)?;
//! let timeline = client.public_timeline(Some(Format::Rss))?;
//! # Ok::<(), twitter_core::ApiError>(())
//! ```

mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod format;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod xml;

pub use client::TwitterClient;
pub use config::{ClientConfig, ClientIdentity};
pub use dispatch::{decode_by_suffix, Call, Payload};
pub use error::ApiError;
pub use feed::{Feed, FeedDecoder, FeedEntry, FeedKind, SyndicationDecoder};
pub use format::{Format, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Params, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Device, SearchOptions, TimelineOptions, UserListOptions};
pub use xml::{XmlDocument, XmlElement};
