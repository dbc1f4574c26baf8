//! Reference to a remote entity by id and/or name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::wire::{SoapValue, XmlNode};

/// A named entity reference used throughout the MantisConnect API.
///
/// Projects, categories, statuses, priorities and the like are referenced
/// by an `ObjectRef` rather than fetched in full. Either the id or the name
/// may be left blank; the service resolves whichever is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    id: i64,
    name: String,
}

impl ObjectRef {
    /// Creates a reference carrying both id and name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a reference by id only.
    pub fn from_id(id: i64) -> Self {
        Self::new(id, String::new())
    }

    /// Creates a reference by name only.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }

    /// The referenced entity's id, 0 if unknown.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The referenced entity's name, empty if unknown.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if neither an id nor a (non-blank) name is set.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.name.trim().is_empty()
    }

    /// Decodes an `ObjectRef` element. A missing or nil element is empty.
    pub(crate) fn from_wire(node: Option<&XmlNode>) -> Result<Self> {
        match node {
            Some(node) => Ok(Self {
                id: node.i64("id")?,
                name: node.string("name"),
            }),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn to_wire(&self) -> SoapValue {
        SoapValue::Struct(vec![
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
        ])
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef( {}, '{}' )", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_document;

    #[test]
    fn test_is_empty_truth_table() {
        assert!(ObjectRef::new(0, "").is_empty());
        assert!(!ObjectRef::new(1, "").is_empty());
        assert!(!ObjectRef::new(0, "x").is_empty());
        assert!(!ObjectRef::new(1, "x").is_empty());
    }

    #[test]
    fn test_whitespace_name_is_empty() {
        assert!(ObjectRef::from_name("   ").is_empty());
        assert!(ObjectRef::default().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ObjectRef::new(10, "new").to_string(),
            "ObjectRef( 10, 'new' )"
        );
    }

    #[test]
    fn test_from_wire() {
        let node = parse_document("<status><id>50</id><name>assigned</name></status>").unwrap();
        let r = ObjectRef::from_wire(Some(&node)).unwrap();
        assert_eq!(r, ObjectRef::new(50, "assigned"));
    }

    #[test]
    fn test_from_wire_missing_is_empty() {
        assert!(ObjectRef::from_wire(None).unwrap().is_empty());
    }

    #[test]
    fn test_to_wire_sends_id_as_text() {
        let wire = ObjectRef::from_id(7).to_wire();
        assert_eq!(wire.field("id").and_then(SoapValue::as_text), Some("7"));
        assert_eq!(wire.field("name").and_then(SoapValue::as_text), Some(""));
    }
}
