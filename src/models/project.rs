//! Project and project version models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::error::Result;
use crate::wire::{SoapValue, XmlNode};

/// A Mantis project with its subprojects.
///
/// Subprojects form a plain owned tree; the service never reports a
/// project as its own ancestor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: i64,

    /// Project name.
    pub name: String,

    /// Development status (development, release, stable, obsolete).
    #[serde(default)]
    pub status: ObjectRef,

    /// Whether the project is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Visibility (public/private).
    #[serde(default)]
    pub view_state: ObjectRef,

    /// Minimum access level required to see the project.
    #[serde(default)]
    pub access_min: ObjectRef,

    /// Upload path on the server.
    #[serde(default)]
    pub file_path: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Child projects, in server order.
    #[serde(default)]
    pub subprojects: Vec<Project>,
}

impl Project {
    /// Project id meaning "the caller's default project".
    pub const DEFAULT_PROJECT: i64 = -1;

    /// Project id meaning "all projects".
    pub const ALL_PROJECTS: i64 = 0;

    /// Creates a new, enabled project for `add_project`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Visits this project and all its descendants, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Project, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Project, usize)) {
        visit(self, depth);
        for child in &self.subprojects {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Finds a project by id in this subtree.
    pub fn find(&self, id: i64) -> Option<&Project> {
        if self.id == id {
            return Some(self);
        }
        self.subprojects.iter().find_map(|p| p.find(id))
    }

    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        let subprojects = match node.child("subprojects") {
            Some(array) => array.items().map(Self::from_wire).collect::<Result<_>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            id: node.i64("id")?,
            name: node.string("name"),
            status: ObjectRef::from_wire(node.child("status"))?,
            enabled: node.bool("enabled")?,
            view_state: ObjectRef::from_wire(node.child("view_state"))?,
            access_min: ObjectRef::from_wire(node.child("access_min"))?,
            file_path: node.string("file_path"),
            description: node.string("description"),
            subprojects,
        })
    }

    pub(crate) fn from_wire_array(node: &XmlNode) -> Result<Vec<Self>> {
        node.items().map(Self::from_wire).collect()
    }

    /// Encodes the project for `mc_project_add`. The service ignores
    /// `access_min` on add, so it always goes out as id 0.
    pub(crate) fn to_wire(&self) -> SoapValue {
        SoapValue::Struct(vec![
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("status", self.status.to_wire()),
            ("enabled", self.enabled.into()),
            ("view_state", self.view_state.to_wire()),
            ("access_min", ObjectRef::from_id(0).to_wire()),
            ("file_path", self.file_path.as_str().into()),
            ("description", self.description.as_str().into()),
        ])
    }
}

/// A version defined on a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectVersion {
    /// Version id, 0 until the service assigns one.
    pub id: i64,

    /// Version name, e.g. `1.2.0`. Required on add and update.
    pub name: Option<String>,

    /// Owning project.
    pub project_id: i64,

    /// Ordering date (usually the release date).
    #[serde(default)]
    pub date_order: Option<DateTime<Utc>>,

    /// Version description. Required on add and update (may be empty).
    pub description: Option<String>,

    /// Whether the version has been released.
    #[serde(default)]
    pub released: bool,
}

impl ProjectVersion {
    /// Creates a new, unreleased version for `add_project_version`.
    pub fn new(project_id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: Some(name.into()),
            project_id,
            date_order: None,
            description: Some(description.into()),
            released: false,
        }
    }

    /// Marks the version as released.
    pub fn with_released(mut self, released: bool) -> Self {
        self.released = released;
        self
    }

    /// Sets the ordering date.
    pub fn with_date_order(mut self, date_order: DateTime<Utc>) -> Self {
        self.date_order = Some(date_order);
        self
    }

    /// Returns the name or an empty string.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            name: Some(node.string("name")),
            project_id: node.i64("project_id")?,
            date_order: node.datetime("date_order")?,
            description: Some(node.string("description")),
            released: node.bool("released")?,
        })
    }

    pub(crate) fn from_wire_array(node: &XmlNode) -> Result<Vec<Self>> {
        node.items().map(Self::from_wire).collect()
    }

    pub(crate) fn to_wire(&self) -> SoapValue {
        SoapValue::Struct(vec![
            ("id", self.id.into()),
            ("name", self.display_name().into()),
            ("project_id", self.project_id.into()),
            ("date_order", SoapValue::datetime(self.date_order.as_ref())),
            (
                "description",
                self.description.as_deref().unwrap_or_default().into(),
            ),
            ("released", self.released.into()),
        ])
    }
}
