//! Saved issue filters.

use serde::{Deserialize, Serialize};

use super::User;
use crate::error::Result;
use crate::wire::XmlNode;

/// A saved filter the caller can use with `get_issues_by_filter`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Filter id.
    pub id: i64,

    /// Account that owns the filter.
    pub owner: User,

    /// Project the filter applies to (0 for all projects).
    pub project_id: i64,

    /// Whether other users can see the filter.
    pub is_public: bool,

    /// Filter name.
    pub name: String,

    /// Serialized filter criteria, opaque to clients.
    pub filter_string: String,
}

impl Filter {
    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            owner: node
                .child("owner")
                .map(User::from_wire)
                .transpose()?
                .unwrap_or_default(),
            project_id: node.i64("project_id")?,
            is_public: node.bool("is_public")?,
            name: node.string("name"),
            filter_string: node.string("filter_string"),
        })
    }

    pub(crate) fn from_wire_array(node: &XmlNode) -> Result<Vec<Self>> {
        node.items().map(Self::from_wire).collect()
    }
}
