//! Element tree for SOAP responses.
//!
//! The tree keeps local names only (`SOAP-ENV:Body` becomes `Body`) since
//! the MantisConnect schema never reuses a local name across namespaces.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{MantisError, Result};

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local element name, without namespace prefix.
    pub name: String,

    /// Attributes as `(local name, raw value)` pairs.
    pub attributes: Vec<(String, String)>,

    /// Concatenated, unescaped text content.
    pub text: String,

    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf element with text content.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Returns the value of an attribute by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the element is marked `xsi:nil="true"`.
    pub fn is_nil(&self) -> bool {
        matches!(self.attribute("nil"), Some("true") | Some("1"))
    }

    /// Returns the first child with the given local name, skipping nil elements.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .filter(|c| !c.is_nil())
    }

    /// Returns the child elements, which for SOAP arrays are the `item`s.
    pub fn items(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter(|c| !c.is_nil())
    }

    /// Returns the text of a child, or `None` if absent or nil.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Returns the text of a child, or an empty string.
    pub fn string(&self, name: &str) -> String {
        self.child_text(name).unwrap_or_default().to_string()
    }

    /// Parses this element's own text as an integer. Blank text reads as 0.
    pub fn as_i64(&self) -> Result<i64> {
        parse_i64(&self.name, &self.text)
    }

    /// Parses this element's own text as a boolean.
    pub fn as_bool(&self) -> Result<bool> {
        parse_bool(&self.name, &self.text)
    }

    /// Parses a child's text as an integer. Absent, nil or blank reads as 0.
    pub fn i64(&self, name: &str) -> Result<i64> {
        match self.child_text(name) {
            Some(text) => parse_i64(name, text),
            None => Ok(0),
        }
    }

    /// Parses a child's text as a boolean. Absent or nil reads as false.
    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.child_text(name) {
            Some(text) => parse_bool(name, text),
            None => Ok(false),
        }
    }

    /// Parses a child's text as an `xsd:dateTime`.
    pub fn datetime(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let text = match self.child_text(name).map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(None),
        };
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                MantisError::decode(format!("`{}` is not a dateTime ({}): {}", name, text, e))
            })
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut node = XmlNode::new(name);

        for attr in start.attributes() {
            let attr =
                attr.map_err(|e| MantisError::decode(format!("XML attribute error: {}", e)))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            node.attributes.push((key, value));
        }

        Ok(node)
    }
}

fn parse_i64(name: &str, text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<i64>()
        .map_err(|_| MantisError::decode(format!("`{}` is not an integer: {:?}", name, text)))
}

fn parse_bool(name: &str, text: &str) -> Result<bool> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(MantisError::decode(format!(
            "`{}` is not a boolean: {:?}",
            name, other
        ))),
    }
}

/// Parses an XML document into its root element.
///
/// # Errors
///
/// Returns `MantisError::Decode` if the document is not well-formed.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(XmlNode::from_start(&e)?);
            }

            Ok(Event::Empty(e)) => {
                let node = XmlNode::from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }

            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| MantisError::decode("unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }

            Ok(Event::Text(e)) => {
                if let Some(node) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| MantisError::decode(format!("XML text error: {}", e)))?;
                    node.text.push_str(&text);
                }
            }

            Ok(Event::CData(e)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }

            Ok(Event::Eof) => {
                return Err(MantisError::decode("unexpected end of XML document"));
            }

            Ok(_) => {}

            Err(e) => {
                return Err(MantisError::decode(format!(
                    "XML parse error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_prefixes() {
        let root = parse_document(
            r#"<?xml version="1.0"?><a:root xmlns:a="urn:x"><a:name>John</a:name></a:root>"#,
        )
        .unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.child_text("name"), Some("John"));
    }

    #[test]
    fn test_parse_builds_tree() {
        let root = parse_document(r#"<r><id>7</id><h xsi:nil="true"/><s>a</s></r>"#).unwrap();
        let expected = XmlNode::new("r")
            .with_child(XmlNode::leaf("id", "7"))
            .with_child(XmlNode::new("h").with_attribute("nil", "true"))
            .with_child(XmlNode::leaf("s", "a"));
        assert_eq!(root, expected);
        assert!(root.children[1].is_nil());
    }

    #[test]
    fn test_parse_unescapes_text() {
        let root = parse_document("<r><s>a &amp; b &lt;c&gt;</s></r>").unwrap();
        assert_eq!(root.string("s"), "a & b <c>");
    }

    #[test]
    fn test_parse_cdata() {
        let root = parse_document("<r><s><![CDATA[<b>bold</b>]]></s></r>").unwrap();
        assert_eq!(root.string("s"), "<b>bold</b>");
    }

    #[test]
    fn test_nil_children_are_skipped() {
        let root = parse_document(
            r#"<r xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><h xsi:nil="true"/></r>"#,
        )
        .unwrap();
        assert!(root.child("h").is_none());
        assert_eq!(root.i64("h").unwrap(), 0);
    }

    #[test]
    fn test_numeric_and_bool_helpers() {
        let root = parse_document("<r><id> 42 </id><ok>true</ok><empty></empty></r>").unwrap();
        assert_eq!(root.i64("id").unwrap(), 42);
        assert!(root.bool("ok").unwrap());
        assert_eq!(root.i64("empty").unwrap(), 0);
        assert_eq!(root.i64("missing").unwrap(), 0);
    }

    #[test]
    fn test_bad_integer_is_decode_error() {
        let root = parse_document("<r><id>abc</id></r>").unwrap();
        let err = root.i64("id").unwrap_err();
        assert!(matches!(err, MantisError::Decode(_)));
    }

    #[test]
    fn test_datetime_helper() {
        let root = parse_document("<r><d>2024-03-01T10:15:00+01:00</d><e></e></r>").unwrap();
        let dt = root.datetime("d").unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T09:15:00+00:00");
        assert_eq!(root.datetime("e").unwrap(), None);
    }

    #[test]
    fn test_truncated_document_fails() {
        let err = parse_document("<r><s>text</s>").unwrap_err();
        assert!(matches!(err, MantisError::Decode(_)));
    }

    #[test]
    fn test_items_in_order() {
        let root = parse_document("<r><item>a</item><item>b</item></r>").unwrap();
        let texts: Vec<&str> = root.items().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
