//! Issue note models.
//!
//! Notes are comments attached to an issue. Their text is multiline and
//! goes through line-ending conversion at the wire boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::multiline::{native_to_wire, wire_to_native};
use super::{ObjectRef, User};
use crate::error::Result;
use crate::wire::{SoapValue, XmlNode};

/// A note attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueNote {
    /// Unique note id, 0 for a note not yet submitted.
    pub id: i64,

    /// Who wrote the note. The service fills this in on submission.
    #[serde(default)]
    pub author: Option<User>,

    /// Note content, using native line endings.
    pub text: String,

    /// Visibility (public/private).
    #[serde(default)]
    pub view_state: ObjectRef,

    /// When the note was submitted.
    #[serde(default)]
    pub date_submitted: Option<DateTime<Utc>>,

    /// When the note was last modified.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl IssueNote {
    /// Creates a new note with the given content.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the note visibility.
    pub fn with_view_state(mut self, view_state: ObjectRef) -> Self {
        self.view_state = view_state;
        self
    }

    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            author: node.child("reporter").map(User::from_wire).transpose()?,
            text: wire_to_native(&node.string("text")),
            view_state: ObjectRef::from_wire(node.child("view_state"))?,
            date_submitted: node.datetime("date_submitted")?,
            last_modified: node.datetime("last_modified")?,
        })
    }

    pub(crate) fn to_wire(&self) -> SoapValue {
        SoapValue::Struct(vec![
            ("id", self.id.into()),
            (
                "reporter",
                self.author.as_ref().map_or(SoapValue::Nil, User::to_wire),
            ),
            ("text", native_to_wire(&self.text).into()),
            ("view_state", self.view_state.to_wire()),
            ("date_submitted", SoapValue::datetime(self.date_submitted.as_ref())),
            ("last_modified", SoapValue::datetime(self.last_modified.as_ref())),
        ])
    }

    /// Decodes an `IssueNoteDataArray`. A missing array yields no notes.
    pub(crate) fn from_wire_array(node: Option<&XmlNode>) -> Result<Vec<Self>> {
        node.map_or(Ok(Vec::new()), |array| {
            array.items().map(Self::from_wire).collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::multiline::NATIVE_NEWLINE;
    use crate::wire::parse_document;

    #[test]
    fn test_note_from_wire() {
        let node = parse_document(
            "<item><id>12</id><reporter><id>1</id><name>admin</name></reporter>\
             <text>first\nsecond</text><view_state><id>10</id><name>public</name></view_state>\
             <date_submitted>2024-01-02T03:04:05+00:00</date_submitted></item>",
        )
        .unwrap();
        let note = IssueNote::from_wire(&node).unwrap();

        assert_eq!(note.id, 12);
        assert_eq!(note.author.as_ref().map(|a| a.name.as_str()), Some("admin"));
        assert_eq!(note.text, format!("first{}second", NATIVE_NEWLINE));
        assert_eq!(note.view_state, ObjectRef::new(10, "public"));
        assert!(note.date_submitted.is_some());
        assert!(note.last_modified.is_none());
    }

    #[test]
    fn test_note_to_wire_without_author() {
        let wire = IssueNote::new("hello").to_wire();
        assert_eq!(wire.field("reporter"), Some(&SoapValue::Nil));
        assert_eq!(wire.field("text").and_then(SoapValue::as_text), Some("hello"));
        assert_eq!(wire.field("id").and_then(SoapValue::as_text), Some("0"));
    }

    #[test]
    fn test_note_array_missing_is_empty() {
        assert!(IssueNote::from_wire_array(None).unwrap().is_empty());
    }
}
