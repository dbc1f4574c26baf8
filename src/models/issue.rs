//! Issue models for the MantisConnect API.
//!
//! An [`Issue`] is a plain value. Fetch one, edit its fields in place, and
//! pass it back to `update_issue` to replace the editable fields on the
//! server.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::multiline::{native_to_wire, wire_to_native};
use super::{Attachment, IssueNote, IssueRelationship, ObjectRef, User};
use crate::error::Result;
use crate::wire::{SoapValue, XmlNode};

/// A Mantis issue (`IssueData` on the wire).
///
/// Multiline fields (`description`, `steps_to_reproduce`,
/// `additional_information`) hold native line endings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue id, 0 for an issue not yet submitted.
    pub id: i64,

    /// Project the issue belongs to.
    pub project: ObjectRef,

    /// Category within the project.
    pub category: ObjectRef,

    /// One-line summary. Required.
    pub summary: String,

    /// Full description. Required.
    pub description: String,

    /// Steps to reproduce.
    #[serde(default)]
    pub steps_to_reproduce: String,

    /// Additional information.
    #[serde(default)]
    pub additional_information: String,

    /// Account that reported the issue.
    #[serde(default)]
    pub reported_by: User,

    /// Account the issue is assigned to, if any.
    #[serde(default)]
    pub assigned_to: Option<User>,

    /// Product version the issue was found in.
    #[serde(default)]
    pub product_version: String,

    /// Product build the issue was found in.
    #[serde(default)]
    pub product_build: String,

    /// Operating system.
    #[serde(default)]
    pub os: String,

    /// Operating system build.
    #[serde(default)]
    pub os_build: String,

    /// Platform.
    #[serde(default)]
    pub platform: String,

    /// Version the issue was fixed in.
    #[serde(default)]
    pub fixed_in_version: String,

    /// Total sponsorship amount.
    #[serde(default)]
    pub sponsorship_total: i64,

    /// How reliably the issue reproduces.
    #[serde(default)]
    pub reproducibility: ObjectRef,
    /// Resolution (open, fixed, won't fix, ...).
    #[serde(default)]
    pub resolution: ObjectRef,
    /// Estimated time to fix.
    #[serde(default)]
    pub eta: ObjectRef,
    /// Workflow status.
    #[serde(default)]
    pub status: ObjectRef,
    /// Priority.
    #[serde(default)]
    pub priority: ObjectRef,
    /// Severity.
    #[serde(default)]
    pub severity: ObjectRef,
    /// Projected size of the change.
    #[serde(default)]
    pub projection: ObjectRef,
    /// Visibility (public/private).
    #[serde(default)]
    pub view_state: ObjectRef,

    /// Submission time, set by the service.
    #[serde(default)]
    pub date_submitted: Option<DateTime<Utc>>,

    /// Last update time, set by the service.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    /// Notes. Sent along on `add_issue`.
    #[serde(default)]
    pub notes: Vec<IssueNote>,

    /// Attachments. Read-only; use `add_attachment` to upload.
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Relationships to other issues. Read-only.
    #[serde(default)]
    pub relationships: Vec<IssueRelationship>,
}

impl Issue {
    /// Creates a new issue with the two required fields.
    pub fn new(summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the project.
    pub fn with_project(mut self, project: ObjectRef) -> Self {
        self.project = project;
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: ObjectRef) -> Self {
        self.category = category;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: ObjectRef) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: ObjectRef) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the reproducibility.
    pub fn with_reproducibility(mut self, reproducibility: ObjectRef) -> Self {
        self.reproducibility = reproducibility;
        self
    }

    /// Sets the view state.
    pub fn with_view_state(mut self, view_state: ObjectRef) -> Self {
        self.view_state = view_state;
        self
    }

    /// Sets the steps to reproduce.
    pub fn with_steps_to_reproduce(mut self, steps: impl Into<String>) -> Self {
        self.steps_to_reproduce = steps.into();
        self
    }

    /// Sets the additional information.
    pub fn with_additional_information(mut self, info: impl Into<String>) -> Self {
        self.additional_information = info.into();
        self
    }

    /// Sets the handler.
    pub fn with_assigned_to(mut self, user: User) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Appends a note to submit with the issue.
    pub fn with_note(mut self, note: IssueNote) -> Self {
        self.notes.push(note);
        self
    }

    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            project: ObjectRef::from_wire(node.child("project"))?,
            category: category_from_wire(node.child("category"))?,
            summary: node.string("summary"),
            description: wire_to_native(&node.string("description")),
            steps_to_reproduce: wire_to_native(&node.string("steps_to_reproduce")),
            additional_information: wire_to_native(&node.string("additional_information")),
            reported_by: node
                .child("reporter")
                .map(User::from_wire)
                .transpose()?
                .unwrap_or_default(),
            assigned_to: node.child("handler").map(User::from_wire).transpose()?,
            product_version: node.string("version"),
            product_build: node.string("build"),
            os: node.string("os"),
            os_build: node.string("os_build"),
            platform: node.string("platform"),
            fixed_in_version: node.string("fixed_in_version"),
            sponsorship_total: node.i64("sponsorship_total")?,
            reproducibility: ObjectRef::from_wire(node.child("reproducibility"))?,
            resolution: ObjectRef::from_wire(node.child("resolution"))?,
            eta: ObjectRef::from_wire(node.child("eta"))?,
            status: ObjectRef::from_wire(node.child("status"))?,
            priority: ObjectRef::from_wire(node.child("priority"))?,
            severity: ObjectRef::from_wire(node.child("severity"))?,
            projection: ObjectRef::from_wire(node.child("projection"))?,
            view_state: ObjectRef::from_wire(node.child("view_state"))?,
            date_submitted: node.datetime("date_submitted")?,
            last_updated: node.datetime("last_updated")?,
            notes: IssueNote::from_wire_array(node.child("notes"))?,
            attachments: Attachment::from_wire_array(node.child("attachments"))?,
            relationships: IssueRelationship::from_wire_array(node.child("relationships"))?,
        })
    }

    /// Encodes the editable fields. Attachments and relationships have
    /// their own calls and are not sent.
    pub(crate) fn to_wire(&self) -> SoapValue {
        let mut fields: Vec<(&'static str, SoapValue)> = vec![
            ("id", self.id.into()),
            ("view_state", self.view_state.to_wire()),
            ("project", self.project.to_wire()),
            ("category", self.category.name().into()),
            ("priority", self.priority.to_wire()),
            ("severity", self.severity.to_wire()),
            ("status", self.status.to_wire()),
            ("reporter", self.reported_by.to_wire()),
            ("summary", self.summary.as_str().into()),
            ("version", self.product_version.as_str().into()),
            ("build", self.product_build.as_str().into()),
            ("platform", self.platform.as_str().into()),
            ("os", self.os.as_str().into()),
            ("os_build", self.os_build.as_str().into()),
            ("reproducibility", self.reproducibility.to_wire()),
            ("date_submitted", SoapValue::datetime(self.date_submitted.as_ref())),
            ("sponsorship_total", self.sponsorship_total.into()),
            (
                "handler",
                self.assigned_to.as_ref().map_or(SoapValue::Nil, User::to_wire),
            ),
            ("projection", self.projection.to_wire()),
            ("eta", self.eta.to_wire()),
            ("resolution", self.resolution.to_wire()),
            ("fixed_in_version", self.fixed_in_version.as_str().into()),
            ("description", native_to_wire(&self.description).into()),
            ("steps_to_reproduce", native_to_wire(&self.steps_to_reproduce).into()),
            (
                "additional_information",
                native_to_wire(&self.additional_information).into(),
            ),
            ("last_updated", SoapValue::datetime(self.last_updated.as_ref())),
        ];

        if !self.notes.is_empty() {
            fields.push((
                "notes",
                SoapValue::Array(self.notes.iter().map(IssueNote::to_wire).collect()),
            ));
        }

        SoapValue::Struct(fields)
    }

    pub(crate) fn from_wire_array(node: &XmlNode) -> Result<Vec<Self>> {
        node.items().map(Self::from_wire).collect()
    }
}

/// The category travels as a plain string; older servers send an
/// `ObjectRef` instead.
fn category_from_wire(node: Option<&XmlNode>) -> Result<ObjectRef> {
    match node {
        Some(n) if !n.children.is_empty() => ObjectRef::from_wire(Some(n)),
        Some(n) => Ok(ObjectRef::from_name(n.text.trim())),
        None => Ok(ObjectRef::default()),
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id = '{}'", self.id)?;
        writeln!(f, "Project = {}", self.project)?;
        writeln!(f, "Category = {}", self.category)?;
        writeln!(f, "Summary = '{}'", self.summary)?;
        writeln!(f, "Description = '{}'", self.description)?;
        writeln!(f, "Status = {}", self.status)?;
        writeln!(f, "Priority = {}", self.priority)?;
        writeln!(f, "Severity = {}", self.severity)?;
        writeln!(f, "Resolution = {}", self.resolution)?;
        writeln!(f, "Reported By = {}", self.reported_by)?;
        match &self.assigned_to {
            Some(user) => writeln!(f, "Assigned To = {}", user),
            None => writeln!(f, "Assigned To = null"),
        }
    }
}
