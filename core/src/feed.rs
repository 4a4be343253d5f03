//! Syndication feeds for `.rss` and `.atom` responses.
//!
//! # Design
//! Feed decoding is a pluggable collaborator: the dispatcher only calls
//! [`FeedDecoder::decode`] with the raw body and the URL it came from. A
//! client without a decoder returns feed responses as raw text.
//! [`SyndicationDecoder`] is the built-in implementation and understands
//! RSS 2.0 and Atom 1.0 on top of [`XmlDocument`].

use serde::Serialize;

use crate::error::ApiError;
use crate::xml::{XmlDocument, XmlElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Rss,
    Atom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub kind: FeedKind,
    /// URL the feed was fetched from.
    pub source_url: String,
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// Turns a raw feed body into a [`Feed`].
pub trait FeedDecoder {
    fn decode(&self, body: &[u8], source_url: &str) -> Result<Feed, ApiError>;
}

/// RSS 2.0 / Atom 1.0 decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyndicationDecoder;

impl FeedDecoder for SyndicationDecoder {
    fn decode(&self, body: &[u8], source_url: &str) -> Result<Feed, ApiError> {
        let doc = XmlDocument::parse(body).map_err(|e| ApiError::Feed(e.to_string()))?;
        match doc.root.local_name() {
            "rss" => rss(&doc.root, source_url),
            "feed" => Ok(atom(&doc.root, source_url)),
            other => Err(ApiError::Feed(format!("unrecognised feed root <{other}>"))),
        }
    }
}

fn owned(text: Option<&str>) -> Option<String> {
    text.filter(|text| !text.is_empty()).map(str::to_string)
}

fn rss(root: &XmlElement, source_url: &str) -> Result<Feed, ApiError> {
    let channel = root
        .child("channel")
        .ok_or_else(|| ApiError::Feed("rss document without <channel>".to_string()))?;

    let entries = channel
        .children_named("item")
        .map(|item| FeedEntry {
            id: owned(item.child_text("guid")),
            title: item.child_text("title").unwrap_or_default().to_string(),
            link: owned(item.child_text("link")),
            summary: owned(item.child_text("description")),
            author: owned(item.child_text("author").or_else(|| item.child_text("creator"))),
            published: owned(item.child_text("pubDate")),
        })
        .collect();

    Ok(Feed {
        kind: FeedKind::Rss,
        source_url: source_url.to_string(),
        title: channel.child_text("title").unwrap_or_default().to_string(),
        link: owned(channel.child_text("link")),
        description: owned(channel.child_text("description")),
        entries,
    })
}

/// `href` of the `alternate` link, or of the first link without a `rel`.
fn atom_link(element: &XmlElement) -> Option<String> {
    element
        .children_named("link")
        .find(|link| matches!(link.attr("rel"), None | Some("alternate")))
        .and_then(|link| owned(link.attr("href")))
}

fn atom(root: &XmlElement, source_url: &str) -> Feed {
    let entries = root
        .children_named("entry")
        .map(|entry| FeedEntry {
            id: owned(entry.child_text("id")),
            title: entry.child_text("title").unwrap_or_default().to_string(),
            link: atom_link(entry),
            summary: owned(
                entry
                    .child_text("content")
                    .or_else(|| entry.child_text("summary")),
            ),
            author: entry
                .child("author")
                .and_then(|author| owned(author.child_text("name"))),
            published: owned(
                entry
                    .child_text("published")
                    .or_else(|| entry.child_text("updated")),
            ),
        })
        .collect();

    Feed {
        kind: FeedKind::Atom,
        source_url: source_url.to_string(),
        title: root.child_text("title").unwrap_or_default().to_string(),
        link: atom_link(root),
        description: owned(root.child_text("subtitle")),
        entries,
    }
}
