//! Dispatch pipeline checks with a recording transport.
//!
//! Every validation failure must happen before the transport is touched, so
//! the recorder counts exchanges and the assertions check it stayed at zero.

use std::cell::RefCell;

use twitter_core::dispatch::{dispatch, Call};
use twitter_core::{
    ApiError, ClientConfig, Device, FeedKind, Format, HttpMethod, HttpRequest, HttpResponse,
    Operation, Payload, SearchOptions, SyndicationDecoder, TimelineOptions, Transport,
    TwitterClient, UserListOptions,
};

/// Records every request and answers 200 with a body that parses for the
/// requested suffix.
#[derive(Default)]
struct Recorder {
    requests: RefCell<Vec<HttpRequest>>,
    status: Option<(u16, &'static str)>,
    body: Option<&'static str>,
}

impl Recorder {
    fn failing(status: u16, reason: &'static str) -> Self {
        Self {
            status: Some((status, reason)),
            ..Self::default()
        }
    }

    fn answering(body: &'static str) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    fn take(&self) -> Vec<HttpRequest> {
        self.requests.take()
    }
}

impl Transport for Recorder {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        let path = request.url.split('?').next().unwrap_or_default();
        let body = match self.body {
            Some(body) => body,
            None if path.ends_with(".xml") => "<ok/>",
            None => "ok",
        };
        let (status, reason) = self.status.unwrap_or((200, "OK"));
        Ok(HttpResponse {
            status,
            reason: reason.to_string(),
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        })
    }
}

type Client = TwitterClient<Recorder>;
type Op = fn(&Client, Option<Format>) -> Result<Payload, ApiError>;

fn op(operation: Operation, call: Op) -> (Operation, Op) {
    (operation, call)
}

fn operations() -> Vec<(Operation, Op)> {
    vec![
        op(Operation::PublicTimeline, |c, f| c.public_timeline(f)),
        op(Operation::FriendsTimeline, |c, f| {
            c.friends_timeline(&TimelineOptions::default(), f)
        }),
        op(Operation::UserTimeline, |c, f| {
            c.user_timeline(Some("bob"), &TimelineOptions::default(), f)
        }),
        op(Operation::StatusShow, |c, f| c.show_status(1, f)),
        op(Operation::StatusUpdate, |c, f| c.update_status("hi", f)),
        op(Operation::StatusDestroy, |c, f| c.destroy_status(1, f)),
        op(Operation::StatusReplies, |c, f| {
            c.replies(&TimelineOptions::default(), f)
        }),
        op(Operation::UserShow, |c, f| c.show_user("bob", f)),
        op(Operation::UserShow, |c, f| c.show_user_by_email("bob@example.com", f)),
        op(Operation::UserFeatured, |c, f| c.featured_users(f)),
        op(Operation::UserFriends, |c, f| {
            c.friends(&UserListOptions::default(), f)
        }),
        op(Operation::UserFollowers, |c, f| {
            c.followers(&UserListOptions::default(), f)
        }),
        op(Operation::DirectMessage, |c, f| {
            c.direct_messages(&TimelineOptions::default(), f)
        }),
        op(Operation::DirectMessageSent, |c, f| {
            c.sent_direct_messages(&TimelineOptions::default(), f)
        }),
        op(Operation::DirectMessageCreate, |c, f| {
            c.send_direct_message("bob", "psst", f)
        }),
        op(Operation::DirectMessageDestroy, |c, f| {
            c.destroy_direct_message(1, f)
        }),
        op(Operation::FriendshipCreate, |c, f| c.create_friendship("bob", f)),
        op(Operation::FriendshipDestroy, |c, f| c.destroy_friendship("bob", f)),
        op(Operation::FriendshipExist, |c, f| {
            c.friendship_exists("alice", "bob", f)
        }),
        op(Operation::Favorites, |c, f| c.favorites(None, f)),
        op(Operation::Favorites, |c, f| c.favorites_by_user("bob", None, f)),
        op(Operation::FavoritesCreate, |c, f| c.create_favorite(1, f)),
        op(Operation::FavoritesDestroy, |c, f| c.destroy_favorite(1, f)),
        op(Operation::NotificationFollow, |c, f| {
            c.follow_notifications("bob", f)
        }),
        op(Operation::NotificationLeave, |c, f| c.leave_notifications("bob", f)),
        op(Operation::BlocksCreate, |c, f| c.create_block("bob", f)),
        op(Operation::BlocksDestroy, |c, f| c.destroy_block("bob", f)),
        op(Operation::AccountUpdateLocation, |c, f| {
            c.update_location("Paris", f)
        }),
        op(Operation::AccountUpdateDeliveryDevice, |c, f| {
            c.update_delivery_device(Device::Im, f)
        }),
        op(Operation::AccountRateLimitStatus, |c, f| c.rate_limit_status(f)),
        op(Operation::AccountVerifyCredentials, |c, f| {
            c.verify_credentials(f)
        }),
        op(Operation::Search, |c, f| {
            c.search("rust", &SearchOptions::default(), f)
        }),
    ]
}

fn client() -> Client {
    TwitterClient::new(
        ClientConfig::new().with_credentials("alice", "secret"),
        Recorder::default(),
    )
}

fn anonymous() -> Client {
    TwitterClient::new(ClientConfig::new(), Recorder::default())
}

const FORMATS: [Format; 4] = [Format::Json, Format::Xml, Format::Rss, Format::Atom];

#[test]
fn format_policy_is_enforced_before_sending() {
    let client = client();
    for (operation, call) in operations() {
        for format in FORMATS {
            let result = call(&client, Some(format));
            let sent = client.transport().take();
            if operation.allows(format) {
                assert!(result.is_ok(), "{operation} {format}: {result:?}");
                assert_eq!(sent.len(), 1, "{operation} {format}");
                let path = sent[0].url.split('?').next().unwrap().to_string();
                assert!(
                    path.ends_with(&format.extension()),
                    "{operation} {format}: {path}"
                );
            } else {
                match result {
                    Err(ApiError::UnsupportedFormat {
                        operation: rejected,
                        format: requested,
                        ..
                    }) => {
                        assert_eq!(rejected, operation);
                        assert_eq!(requested, format.as_str());
                    }
                    other => panic!("{operation} {format}: expected UnsupportedFormat, got {other:?}"),
                }
                assert!(sent.is_empty(), "{operation} {format} reached the transport");
            }
        }
    }
}

#[test]
fn credentials_are_checked_before_sending() {
    let client = anonymous();
    let public = [Operation::PublicTimeline, Operation::Search];
    let mut anonymous_calls = 0;
    for (operation, call) in operations() {
        let result = call(&client, None);
        let sent = client.transport().take();
        match result {
            Err(ApiError::AuthRequired { url }) => {
                assert!(sent.is_empty(), "{operation} reached the transport");
                assert!(url.starts_with("http://twitter.com/"), "{url}");
            }
            Ok(_) => {
                anonymous_calls += 1;
                assert_eq!(sent.len(), 1);
                assert_eq!(sent[0].header("Authorization"), None);
                assert!(
                    public.contains(&operation) || sent[0].url.contains("/favorites/bob"),
                    "{operation} should need credentials"
                );
            }
            Err(other) => panic!("{operation}: unexpected {other:?}"),
        }
    }
    // public timeline, favorites of a named user and search
    assert_eq!(anonymous_calls, 3);
}

#[test]
fn friendship_exists_needs_credentials() {
    let client = anonymous();
    let err = client.friendship_exists("alice", "bob", None).unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired { .. }));
    assert!(client.transport().take().is_empty());
}

#[test]
fn unset_options_are_not_sent() {
    let client = client();
    client
        .friends_timeline(&TimelineOptions::default(), None)
        .unwrap();
    client.favorites(None, None).unwrap();
    client.friends(&UserListOptions::default(), None).unwrap();

    let urls: Vec<_> = client
        .transport()
        .take()
        .into_iter()
        .map(|request| request.url)
        .collect();
    assert_eq!(
        urls,
        [
            "http://twitter.com/statuses/friends_timeline.json",
            "http://twitter.com/favorites.json",
            "http://twitter.com/statuses/friends.json",
        ]
    );
}

#[test]
fn set_options_become_query_parameters() {
    let client = client();
    let options = TimelineOptions {
        since_id: Some(12345),
        page: Some(3),
        count: Some(20),
        ..TimelineOptions::default()
    };
    client.friends_timeline(&options, None).unwrap();

    let request = &client.transport().take()[0];
    assert_eq!(
        request.url,
        "http://twitter.com/statuses/friends_timeline.json?since_id=12345&page=3&count=20"
    );
    assert_eq!(request.body, None);
}

#[test]
fn long_status_is_truncated_to_the_configured_length() {
    let client = client();
    client.update_status(&"a".repeat(200), None).unwrap();

    let request = &client.transport().take()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "http://twitter.com/statuses/update.json");
    assert_eq!(
        request.body.as_deref(),
        Some(format!("status={}", "a".repeat(140)).as_str())
    );
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[test]
fn truncation_counts_characters_not_bytes() {
    let mut client = client();
    client.set_max_status_length(3);
    client.update_status("héllo", None).unwrap();

    let request = &client.transport().take()[0];
    assert_eq!(request.body.as_deref(), Some("status=h%C3%A9l"));
}

#[test]
fn empty_status_is_a_missing_parameter() {
    let client = client();
    let err = client.update_status("  ", None).unwrap_err();
    assert!(matches!(
        err,
        ApiError::MissingParameter {
            operation: Operation::StatusUpdate,
            parameter: "status"
        }
    ));
    assert!(client.transport().take().is_empty());
}

#[test]
fn unknown_default_format_is_rejected_and_kept() {
    let mut client = client();
    let err = client.set_default_format("yaml").unwrap_err();
    assert_eq!(
        err.to_string(),
        "allowed: allow json, xml, rss, atom formats. Invalid format: yaml"
    );
    assert_eq!(client.config().default_format(), Format::Json);

    client.set_default_format("XML").unwrap();
    assert_eq!(client.config().default_format(), Format::Xml);
}

#[test]
fn xml_default_is_parsed() {
    let mut client = client();
    client.set_default_format("xml").unwrap();

    let payload = client.verify_credentials(None).unwrap();
    assert_eq!(payload.as_xml().unwrap().root.name, "ok");
    assert_eq!(
        client.transport().take()[0].url,
        "http://twitter.com/account/verify_credentials.xml"
    );
}

#[test]
fn json_is_returned_as_text() {
    let client = client();
    let payload = client.rate_limit_status(None).unwrap();
    assert_eq!(payload, Payload::Text("ok".to_string()));
}

#[test]
fn feed_without_decoder_is_text() {
    let client = client();
    let payload = client.public_timeline(Some(Format::Rss)).unwrap();
    assert_eq!(payload.as_text(), Some("ok"));
}

#[test]
fn search_without_any_parameter_is_rejected() {
    let client = client();
    let err = client
        .search("", &SearchOptions::default(), None)
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::MissingParameter {
            operation: Operation::Search,
            parameter: "q"
        }
    ));
    assert!(client.transport().take().is_empty());

    let options = SearchOptions {
        lang: Some("en".to_string()),
        ..SearchOptions::default()
    };
    client.search("", &options, None).unwrap();
    let request = &client.transport().take()[0];
    assert_eq!(request.url, "http://search.twitter.com/search.json?lang=en");
}

#[test]
fn search_rejects_xml() {
    let client = client();
    let err = client
        .search("rust", &SearchOptions::default(), Some(Format::Xml))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "search: allow json, atom formats. Invalid format: xml"
    );
}

#[test]
fn delivery_device_is_validated_when_parsed() {
    let err = "pager".parse::<Device>().unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidArgument {
            parameter: "device",
            ..
        }
    ));
    assert_eq!("SMS".parse::<Device>().unwrap(), Device::Sms);

    let client = client();
    client.update_delivery_device(Device::None, None).unwrap();
    let request = &client.transport().take()[0];
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(
        request.url,
        "http://twitter.com/account/update_delivery_device.json?device=none"
    );
    assert_eq!(request.body, None);
}

#[test]
fn identity_and_auth_headers_are_sent() {
    let client = client();
    client.public_timeline(None).unwrap();

    let request = &client.transport().take()[0];
    assert_eq!(request.header("x-twitter-client"), Some("twitter-core"));
    assert_eq!(
        request.header("X-Twitter-Client-Version"),
        Some(env!("CARGO_PKG_VERSION"))
    );
    assert_eq!(
        request.header("User-Agent"),
        Some(format!("twitter-core v.{}", env!("CARGO_PKG_VERSION")).as_str())
    );
    assert_eq!(
        request.header("Authorization"),
        Some("Basic YWxpY2U6c2VjcmV0")
    );
    assert_eq!(request.header("Content-Type"), None);
}

#[test]
fn delete_is_refused() {
    let config = ClientConfig::new().with_credentials("alice", "secret");
    let transport = Recorder::default();
    let call = Call::new(
        Operation::StatusDestroy,
        HttpMethod::Delete,
        "http://twitter.com/statuses/destroy/1.json".to_string(),
    );

    let err = dispatch(&config, &transport, None, call).unwrap_err();
    assert!(matches!(err, ApiError::InvalidVerb(HttpMethod::Delete)));
    assert!(transport.take().is_empty());
}

#[test]
fn server_errors_carry_status_and_reason() {
    let client = TwitterClient::new(
        ClientConfig::new().with_credentials("alice", "secret"),
        Recorder::failing(503, "Service Unavailable"),
    );
    let err = client.public_timeline(None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "the given URL (http://twitter.com/statuses/public_timeline.json) returns an error (503: Service Unavailable)"
    );
}

#[test]
fn redirects_count_as_success() {
    let client = TwitterClient::new(ClientConfig::new(), Recorder::failing(304, "Not Modified"));
    assert!(client.public_timeline(None).is_ok());
}

// --- end-to-end scenarios ---

#[test]
fn status_update_as_alice_returns_json_text() {
    let body = r#"{"id":1,"text":"hello world"}"#;
    let client = TwitterClient::new(
        ClientConfig::new().with_credentials("alice", "secret"),
        Recorder::answering(body),
    );

    let payload = client.update_status("hello world", None).unwrap();
    assert_eq!(payload, Payload::Text(body.to_string()));

    let sent = client.transport().take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].url, "http://twitter.com/statuses/update.json");
    assert_eq!(sent[0].body.as_deref(), Some("status=hello+world"));
}

#[test]
fn public_timeline_as_rss_goes_through_the_feed_decoder() {
    let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Twitter public timeline</title>
<item><title>alice: hello world</title><link>http://twitter.com/alice/statuses/1</link></item>
</channel></rss>"#;
    let client = TwitterClient::new(ClientConfig::new(), Recorder::answering(rss))
        .with_feed_decoder(SyndicationDecoder);

    let payload = client.public_timeline(Some(Format::Rss)).unwrap();
    let feed = payload.as_feed().unwrap();
    assert_eq!(feed.kind, FeedKind::Rss);
    assert_eq!(feed.source_url, "http://twitter.com/statuses/public_timeline.rss");
    assert_eq!(feed.entries[0].title, "alice: hello world");

    let sent = client.transport().take();
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].header("Authorization"), None);
}

#[test]
fn friendship_exists_without_credentials_never_sends() {
    let client = anonymous();
    let err = client
        .friendship_exists("bob", "carol", Some(Format::Xml))
        .unwrap_err();
    match err {
        ApiError::AuthRequired { url } => {
            assert_eq!(url, "http://twitter.com/friendships/exists.xml");
        }
        other => panic!("expected AuthRequired, got {other:?}"),
    }
    assert!(client.transport().take().is_empty());
}
