//! In-memory stand-in for the Twitter REST API, used by the client's
//! integration tests and for manual experiments.
//!
//! Every resource is addressed as `<path>.<format>` where format is one of
//! `json`, `xml`, `rss` or `atom`. Authenticated resources expect HTTP basic
//! credentials matching an account in the [`Store`].

pub mod render;

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEVICES: [&str; 3] = ["im", "sms", "none"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
    Rss,
    Atom,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "rss" => Some(Self::Rss),
            "atom" => Some(Self::Atom),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json; charset=utf-8",
            Self::Xml => "application/xml; charset=utf-8",
            Self::Rss => "application/rss+xml; charset=utf-8",
            Self::Atom => "application/atom+xml; charset=utf-8",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub text: String,
    pub screen_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: u64,
    pub sender_screen_name: String,
    pub recipient_screen_name: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub screen_name: String,
    pub location: Option<String>,
    pub delivery_device: String,
}

#[derive(Debug, Default)]
pub struct Store {
    passwords: HashMap<String, String>,
    users: HashMap<String, User>,
    follows: HashSet<(String, String)>,
    statuses: Vec<Status>,
    messages: Vec<DirectMessage>,
    next_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts `alice:secret` and `bob:hunter2`, with alice following bob.
    pub fn seeded() -> Self {
        Self::new()
            .with_account("alice", "secret")
            .with_account("bob", "hunter2")
            .with_follow("alice", "bob")
    }

    pub fn with_account(mut self, screen_name: &str, password: &str) -> Self {
        self.passwords
            .insert(screen_name.to_string(), password.to_string());
        self.users.insert(
            screen_name.to_string(),
            User {
                screen_name: screen_name.to_string(),
                location: None,
                delivery_device: "none".to_string(),
            },
        );
        self
    }

    pub fn with_follow(mut self, follower: &str, followed: &str) -> Self {
        self.follows
            .insert((follower.to_string(), followed.to_string()));
        self
    }

    pub fn with_status(mut self, screen_name: &str, text: &str) -> Self {
        self.post(screen_name, text);
        self
    }

    fn post(&mut self, screen_name: &str, text: &str) -> Status {
        self.next_id += 1;
        let status = Status {
            id: self.next_id,
            text: text.to_string(),
            screen_name: screen_name.to_string(),
        };
        self.statuses.push(status.clone());
        status
    }

    /// Newest first.
    fn timeline(&self, keep: impl Fn(&Status) -> bool) -> Vec<Status> {
        self.statuses
            .iter()
            .rev()
            .filter(|status| keep(status))
            .cloned()
            .collect()
    }

    /// Direct messages matching `keep`, newest first.
    fn inbox(&self, keep: impl Fn(&DirectMessage) -> bool) -> Vec<DirectMessage> {
        self.messages
            .iter()
            .rev()
            .filter(|message| keep(message))
            .cloned()
            .collect()
    }

    /// Screen name of the account the `Authorization` header names, if its
    /// password matches.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<String, Failure> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Failure::Unauthorized)?;
        let encoded = value.strip_prefix("Basic ").ok_or(Failure::Unauthorized)?;
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| Failure::Unauthorized)?;
        let decoded = String::from_utf8(decoded).map_err(|_| Failure::Unauthorized)?;
        let (user, password) = decoded.split_once(':').ok_or(Failure::Unauthorized)?;
        match self.passwords.get(user) {
            Some(expected) if expected == password => Ok(user.to_string()),
            _ => {
                debug!(user, "rejected credentials");
                Err(Failure::Unauthorized)
            }
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Forbidden(String),
    NotFound,
    Internal(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Could not authenticate you.").into_response()
            }
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
        }
    }
}

type Fields = HashMap<String, String>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/statuses/{file}", get(read_statuses).post(update_status))
        .route("/statuses/show/{file}", get(show_status))
        .route("/statuses/destroy/{file}", get(destroy_status))
        .route("/account/{file}", get(read_account))
        .route("/friendships/{file}", get(friendship_exists))
        .route("/friendships/create/{file}", get(create_friendship))
        .route("/friendships/destroy/{file}", get(destroy_friendship))
        .route(
            "/direct_messages/{file}",
            get(sent_direct_messages).post(send_direct_message),
        )
        .route("/{file}", get(read_root))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Split `name.ext` into the resource name and its format.
pub fn split_file(file: &str) -> Result<(&str, Format), Failure> {
    let (name, extension) = file.rsplit_once('.').ok_or(Failure::NotFound)?;
    let format = Format::from_extension(extension).ok_or(Failure::NotFound)?;
    Ok((name, format))
}

fn required<'a>(fields: &'a Fields, name: &str) -> Result<&'a str, Failure> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Failure::Forbidden(format!("{name} is required")))
}

/// Apply `since_id` and `count` to a newest-first timeline.
fn page(mut statuses: Vec<Status>, query: &Fields) -> Vec<Status> {
    if let Some(since_id) = query.get("since_id").and_then(|v| v.parse::<u64>().ok()) {
        statuses.retain(|status| status.id > since_id);
    }
    if let Some(count) = query.get("count").and_then(|v| v.parse::<usize>().ok()) {
        statuses.truncate(count);
    }
    statuses
}

async fn read_statuses(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    let store = db.read().await;
    let statuses = match name {
        "public_timeline" => store.timeline(|_| true),
        "friends_timeline" => {
            let user = store.authenticate(&headers)?;
            let follows = &store.follows;
            store.timeline(move |status| {
                status.screen_name == user
                    || follows.contains(&(user.clone(), status.screen_name.clone()))
            })
        }
        "user_timeline" => {
            let user = store.authenticate(&headers)?;
            let target = query.get("id").cloned().unwrap_or(user);
            store.timeline(move |status| status.screen_name == target)
        }
        _ => return Err(Failure::NotFound),
    };
    render::statuses(format, name, &page(statuses, &query))
}

async fn update_status(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Form(form): Form<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    if name != "update" {
        return Err(Failure::NotFound);
    }
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    let text = required(&form, "status")?;
    let status = store.post(&user, text);
    info!(id = status.id, user = %status.screen_name, "status posted");
    render::status(format, &status)
}

fn status_id(name: &str) -> Result<u64, Failure> {
    name.parse().map_err(|_| Failure::NotFound)
}

async fn show_status(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    let id = status_id(name)?;
    let store = db.read().await;
    let status = store
        .statuses
        .iter()
        .find(|status| status.id == id)
        .ok_or(Failure::NotFound)?;
    render::status(format, status)
}

async fn destroy_status(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    let id = status_id(name)?;
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    let index = store
        .statuses
        .iter()
        .position(|status| status.id == id)
        .ok_or(Failure::NotFound)?;
    if store.statuses[index].screen_name != user {
        return Err(Failure::Forbidden(
            "You may not delete another user's status.".to_string(),
        ));
    }
    let status = store.statuses.remove(index);
    info!(id, user = %user, "status destroyed");
    render::status(format, &status)
}

async fn read_account(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    match name {
        "verify_credentials" => {}
        "rate_limit_status" => return render::rate_limit(format, 100, 100),
        "update_location" => {
            let location = required(&query, "location")?.to_string();
            if let Some(account) = store.users.get_mut(&user) {
                account.location = Some(location);
            }
        }
        "update_delivery_device" => {
            let device = required(&query, "device")?;
            if !DEVICES.contains(&device) {
                return Err(Failure::Forbidden(format!("unknown device: {device}")));
            }
            if let Some(account) = store.users.get_mut(&user) {
                account.delivery_device = device.to_string();
            }
        }
        _ => return Err(Failure::NotFound),
    }
    let account = store.users.get(&user).ok_or(Failure::NotFound)?;
    render::user(format, account)
}

async fn friendship_exists(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    if name != "exists" {
        return Err(Failure::NotFound);
    }
    let store = db.read().await;
    store.authenticate(&headers)?;
    let follower = required(&query, "user_a")?;
    let followed = required(&query, "user_b")?;
    let exists = store
        .follows
        .contains(&(follower.to_string(), followed.to_string()));
    render::boolean(format, "friends", exists)
}

async fn create_friendship(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Result<Response, Failure> {
    let (target, format) = split_file(&file)?;
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    let followed = store.users.get(target).cloned().ok_or(Failure::NotFound)?;
    store.follows.insert((user, target.to_string()));
    render::user(format, &followed)
}

async fn destroy_friendship(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Result<Response, Failure> {
    let (target, format) = split_file(&file)?;
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    let unfollowed = store.users.get(target).cloned().ok_or(Failure::NotFound)?;
    store.follows.remove(&(user, target.to_string()));
    render::user(format, &unfollowed)
}

async fn send_direct_message(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Form(form): Form<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    if name != "new" {
        return Err(Failure::NotFound);
    }
    let mut store = db.write().await;
    let sender = store.authenticate(&headers)?;
    let recipient = required(&form, "user")?.to_string();
    let text = required(&form, "text")?.to_string();
    if !store.users.contains_key(&recipient) {
        return Err(Failure::Forbidden(
            "There was an error sending your message.".to_string(),
        ));
    }
    store.next_id += 1;
    let message = DirectMessage {
        id: store.next_id,
        sender_screen_name: sender,
        recipient_screen_name: recipient,
        text,
    };
    store.messages.push(message.clone());
    render::direct_message(format, &message)
}

async fn sent_direct_messages(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    if name != "sent" {
        return Err(Failure::NotFound);
    }
    let store = db.read().await;
    let user = store.authenticate(&headers)?;
    let after = since_id(&query);
    let sent = store.inbox(|message| message.sender_screen_name == user && message.id > after);
    render::direct_messages(format, &sent)
}

/// Top-level resources: the received direct messages and search.
async fn read_root(
    State(db): State<Db>,
    Path(file): Path<String>,
    headers: HeaderMap,
    Query(query): Query<Fields>,
) -> Result<Response, Failure> {
    let (name, format) = split_file(&file)?;
    let store = db.read().await;
    match name {
        "direct_messages" => {
            let user = store.authenticate(&headers)?;
            let after = since_id(&query);
            let received =
                store.inbox(|message| message.recipient_screen_name == user && message.id > after);
            render::direct_messages(format, &received)
        }
        "search" => search(&store, format, &query),
        _ => Err(Failure::NotFound),
    }
}

fn since_id(query: &Fields) -> u64 {
    query
        .get("since_id")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

fn search(store: &Store, format: Format, query: &Fields) -> Result<Response, Failure> {
    let needle = query.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
    let mut results = store.timeline(|status| status.text.to_lowercase().contains(&needle));
    if let Some(rpp) = query.get("rpp").and_then(|v| v.parse::<usize>().ok()) {
        results.truncate(rpp);
    }
    render::search(format, &needle, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(credentials: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(credentials));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        headers
    }

    #[test]
    fn split_file_reads_extension() {
        assert_eq!(split_file("update.json").unwrap(), ("update", Format::Json));
        assert_eq!(split_file("12.XML").unwrap(), ("12", Format::Xml));
        assert_eq!(split_file("update"), Err(Failure::NotFound));
        assert_eq!(split_file("update.yaml"), Err(Failure::NotFound));
    }

    #[test]
    fn authenticate_accepts_matching_password() {
        let store = Store::seeded();
        assert_eq!(store.authenticate(&basic("alice:secret")).unwrap(), "alice");
    }

    #[test]
    fn authenticate_rejects_wrong_password_and_missing_header() {
        let store = Store::seeded();
        assert_eq!(
            store.authenticate(&basic("alice:wrong")),
            Err(Failure::Unauthorized)
        );
        assert_eq!(
            store.authenticate(&HeaderMap::new()),
            Err(Failure::Unauthorized)
        );
    }

    #[test]
    fn timeline_is_newest_first() {
        let store = Store::seeded()
            .with_status("alice", "first")
            .with_status("bob", "second");
        let texts: Vec<_> = store
            .timeline(|_| true)
            .into_iter()
            .map(|status| status.text)
            .collect();
        assert_eq!(texts, ["second", "first"]);
    }

    #[test]
    fn page_applies_since_id_and_count() {
        let store = Store::new()
            .with_status("alice", "one")
            .with_status("alice", "two")
            .with_status("alice", "three");
        let mut query = Fields::new();
        query.insert("since_id".to_string(), "1".to_string());
        query.insert("count".to_string(), "1".to_string());
        let statuses = page(store.timeline(|_| true), &query);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].text, "three");
    }

    #[test]
    fn status_serializes_to_json() {
        let status = Status {
            id: 7,
            text: "hi".to_string(),
            screen_name: "carol".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["screen_name"], "carol");
    }
}
