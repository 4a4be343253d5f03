//! Response bodies in the four wire formats.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use quick_xml::escape::escape;
use serde::Serialize;
use serde_json::json;

use crate::{DirectMessage, Failure, Format, Status, User};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITE: &str = "http://twitter.com";

fn respond(format: Format, body: String) -> Result<Response, Failure> {
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Failure> {
    serde_json::to_string(value).map_err(|e| Failure::Internal(e.to_string()))
}

fn permalink(status: &Status) -> String {
    format!("{SITE}/{}/statuses/{}", status.screen_name, status.id)
}

fn status_element(status: &Status) -> String {
    format!(
        "<status><id>{}</id><text>{}</text><user><screen_name>{}</screen_name></user></status>",
        status.id,
        escape(status.text.as_str()),
        escape(status.screen_name.as_str()),
    )
}

fn rss(title: &str, statuses: &[Status]) -> String {
    let mut body = format!(
        "{XML_DECLARATION}<rss version=\"2.0\"><channel><title>Twitter / {}</title>\
         <link>{SITE}/{}</link><description>Twitter updates</description>",
        escape(title),
        escape(title),
    );
    for status in statuses {
        let line = format!("{}: {}", status.screen_name, status.text);
        let text = escape(line.as_str()).into_owned();
        let link = permalink(status);
        body.push_str(&format!(
            "<item><title>{text}</title><description>{text}</description>\
             <guid>{link}</guid><link>{link}</link></item>"
        ));
    }
    body.push_str("</channel></rss>");
    body
}

fn atom(title: &str, statuses: &[Status]) -> String {
    let mut body = format!(
        "{XML_DECLARATION}<feed xmlns=\"http://www.w3.org/2005/Atom\"><title>{}</title>\
         <id>tag:twitter.com,2007:{}</id><link rel=\"alternate\" href=\"{SITE}/\"/>",
        escape(title),
        escape(title),
    );
    for status in statuses {
        let link = permalink(status);
        body.push_str(&format!(
            "<entry><id>tag:twitter.com,2007:{link}</id><title>{}</title>\
             <link rel=\"alternate\" href=\"{link}\"/><content>{}</content>\
             <author><name>{}</name></author></entry>",
            escape(status.text.as_str()),
            escape(status.text.as_str()),
            escape(status.screen_name.as_str()),
        ));
    }
    body.push_str("</feed>");
    body
}

pub fn statuses(format: Format, title: &str, statuses: &[Status]) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(statuses)?,
        Format::Xml => {
            let items: String = statuses.iter().map(status_element).collect();
            format!("{XML_DECLARATION}<statuses type=\"array\">{items}</statuses>")
        }
        Format::Rss => rss(title, statuses),
        Format::Atom => atom(title, statuses),
    };
    respond(format, body)
}

pub fn status(format: Format, status: &Status) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(status)?,
        Format::Xml => format!("{XML_DECLARATION}{}", status_element(status)),
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

pub fn user(format: Format, user: &User) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(user)?,
        Format::Xml => format!(
            "{XML_DECLARATION}<user><screen_name>{}</screen_name><location>{}</location>\
             <delivery_device>{}</delivery_device></user>",
            escape(user.screen_name.as_str()),
            escape(user.location.as_deref().unwrap_or_default()),
            escape(user.delivery_device.as_str()),
        ),
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

fn message_element(message: &DirectMessage) -> String {
    format!(
        "<direct_message><id>{}</id><text>{}</text>\
         <sender_screen_name>{}</sender_screen_name>\
         <recipient_screen_name>{}</recipient_screen_name></direct_message>",
        message.id,
        escape(message.text.as_str()),
        escape(message.sender_screen_name.as_str()),
        escape(message.recipient_screen_name.as_str()),
    )
}

pub fn direct_message(format: Format, message: &DirectMessage) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(message)?,
        Format::Xml => format!("{XML_DECLARATION}{}", message_element(message)),
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

pub fn direct_messages(format: Format, messages: &[DirectMessage]) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(messages)?,
        Format::Xml => {
            let items: String = messages.iter().map(message_element).collect();
            format!("{XML_DECLARATION}<direct-messages type=\"array\">{items}</direct-messages>")
        }
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

pub fn rate_limit(format: Format, remaining: u32, limit: u32) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => to_json(&json!({ "remaining_hits": remaining, "hourly_limit": limit }))?,
        Format::Xml => format!(
            "{XML_DECLARATION}<hash><remaining-hits type=\"integer\">{remaining}</remaining-hits>\
             <hourly-limit type=\"integer\">{limit}</hourly-limit></hash>"
        ),
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

pub fn boolean(format: Format, element: &str, value: bool) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => value.to_string(),
        Format::Xml => format!("{XML_DECLARATION}<{element}>{value}</{element}>"),
        Format::Rss | Format::Atom => return Err(Failure::NotFound),
    };
    respond(format, body)
}

pub fn search(format: Format, query: &str, results: &[Status]) -> Result<Response, Failure> {
    let body = match format {
        Format::Json => {
            let results: Vec<_> = results
                .iter()
                .map(|status| {
                    json!({
                        "id": status.id,
                        "text": status.text,
                        "from_user": status.screen_name,
                    })
                })
                .collect();
            to_json(&json!({ "results": results, "query": query }))?
        }
        Format::Atom => atom(&format!("{query} - Twitter Search"), results),
        Format::Xml | Format::Rss => return Err(Failure::NotFound),
    };
    respond(format, body)
}
