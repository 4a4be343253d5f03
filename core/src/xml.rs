//! Structured XML documents for `.xml` responses.
//!
//! The tree keeps element names exactly as written (prefix included),
//! attributes in document order and the concatenated, unescaped text of each
//! element. Mixed content is flattened into `text`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn open(start: &BytesStart<'_>) -> Result<Self, ApiError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| ApiError::Xml(e.to_string()))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| ApiError::Xml(e.to_string()))?;
            attributes.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child whose local name is `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.local_name() == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children
            .iter()
            .filter(move |child| child.local_name() == name)
    }

    /// Text of the first direct child named `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Err(e) => {
                    return Err(ApiError::Xml(format!(
                        "{e} at byte {}",
                        reader.buffer_position()
                    )))
                }
                Ok(Event::Eof) => break,
                Ok(Event::Start(start)) => open.push(XmlElement::open(&start)?),
                Ok(Event::Empty(start)) => {
                    let element = XmlElement::open(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| ApiError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::Text(text)) => {
                    if let Some(current) = open.last_mut() {
                        let text = text.unescape().map_err(|e| ApiError::Xml(e.to_string()))?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(current) = open.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Ok(_) => {}
            }
            buf.clear();
        }

        if let Some(unclosed) = open.last() {
            return Err(ApiError::Xml(format!("unclosed element <{}>", unclosed.name)));
        }
        root.map(|root| XmlDocument { root })
            .ok_or_else(|| ApiError::Xml("document has no root element".to_string()))
    }
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ApiError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ApiError::Xml(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
  <created_at>Tue Mar 27 22:55:48 +0000 2007</created_at>
  <id>1234</id>
  <text>fish &amp; chips</text>
  <truncated>false</truncated>
  <user>
    <id>42</id>
    <screen_name>alice</screen_name>
  </user>
</status>"#;

    #[test]
    fn parses_nested_elements() {
        let doc = XmlDocument::parse(STATUS.as_bytes()).unwrap();
        assert_eq!(doc.root.name, "status");
        assert_eq!(doc.root.child_text("id"), Some("1234"));
        assert_eq!(doc.root.child_text("text"), Some("fish & chips"));
        let user = doc.root.child("user").unwrap();
        assert_eq!(user.child_text("screen_name"), Some("alice"));
    }

    #[test]
    fn keeps_attributes_and_empty_elements() {
        let doc = XmlDocument::parse(
            br#"<statuses type="array"><status/><status><id>2</id></status></statuses>"#,
        )
        .unwrap();
        assert_eq!(doc.root.attr("type"), Some("array"));
        assert_eq!(doc.root.children_named("status").count(), 2);
        assert!(doc.root.children[0].children.is_empty());
    }

    #[test]
    fn cdata_becomes_text() {
        let doc = XmlDocument::parse(b"<text><![CDATA[<b>bold</b>]]></text>").unwrap();
        assert_eq!(doc.root.text, "<b>bold</b>");
    }

    #[test]
    fn local_name_strips_prefix() {
        let doc = XmlDocument::parse(br#"<a:feed xmlns:a="urn:x"><a:title>t</a:title></a:feed>"#)
            .unwrap();
        assert_eq!(doc.root.name, "a:feed");
        assert_eq!(doc.root.local_name(), "feed");
        assert_eq!(doc.root.child_text("title"), Some("t"));
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = XmlDocument::parse(b"<status><id>1</text></status>").unwrap_err();
        assert!(matches!(err, ApiError::Xml(_)));
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = XmlDocument::parse(b"<status><id>1</id>").unwrap_err();
        assert!(matches!(err, ApiError::Xml(msg) if msg.contains("status")));
    }

    #[test]
    fn rejects_plain_text() {
        let err = XmlDocument::parse(b"[]").unwrap_err();
        assert!(matches!(err, ApiError::Xml(_)));
    }
}
