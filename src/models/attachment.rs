//! Attachment and relationship models. Both are read-only views returned
//! as part of an issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::error::Result;
use crate::wire::XmlNode;

/// Metadata of a file attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment id.
    pub id: i64,

    /// Original file name.
    pub file_name: String,

    /// Size in bytes.
    pub size: i64,

    /// MIME type as stored by the service.
    pub content_type: String,

    /// Upload time.
    pub date_submitted: Option<DateTime<Utc>>,

    /// URL the file can be downloaded from in a browser.
    pub download_url: String,
}

impl Attachment {
    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            file_name: node.string("filename"),
            size: node.i64("size")?,
            content_type: node.string("content_type"),
            date_submitted: node.datetime("date_submitted")?,
            download_url: node.string("download_url"),
        })
    }

    pub(crate) fn from_wire_array(node: Option<&XmlNode>) -> Result<Vec<Self>> {
        node.map_or(Ok(Vec::new()), |array| {
            array.items().map(Self::from_wire).collect()
        })
    }
}

/// A relationship from one issue to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRelationship {
    /// Relationship id.
    pub id: i64,

    /// Relationship type (duplicate of, related to, parent of, ...).
    pub relationship_type: ObjectRef,

    /// Id of the issue at the other end.
    pub target_id: i64,
}

impl IssueRelationship {
    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            relationship_type: ObjectRef::from_wire(node.child("type"))?,
            target_id: node.i64("target_id")?,
        })
    }

    pub(crate) fn from_wire_array(node: Option<&XmlNode>) -> Result<Vec<Self>> {
        node.map_or(Ok(Vec::new()), |array| {
            array.items().map(Self::from_wire).collect()
        })
    }
}
