//! Typed gateway to the MantisConnect operations.
//!
//! [`Request`] is the single point of outbound calls. Every operation
//! validates its arguments, encodes models to the wire, invokes the
//! transport exactly once and decodes the result.
//!
//! Invalid arguments are rejected with `MantisError::InvalidArgument`
//! before anything is sent. Remote and transport failures propagate
//! unchanged.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{InvalidReason, MantisError, Result};
use crate::models::{Filter, Issue, IssueNote, Project, ProjectVersion};
use crate::soap_client::Transport;
use crate::validate;
use crate::wire::{Params, SoapValue, XmlNode};

/// The account every call is made as.
struct Credentials {
    username: String,
    /// SECURITY: Never log this value!
    password: String,
}

/// Gateway for all MantisConnect operations.
///
/// Cloning is cheap and clones share the transport.
///
/// # Example
///
/// ```ignore
/// let session = Session::new(SessionConfig::from_env()?)?;
/// let id = session
///     .request()
///     .add_issue(&Issue::new("Crash on save", "Steps...").with_project(ObjectRef::from_id(1)))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Request {
    transport: Arc<dyn Transport>,
    credentials: Arc<Credentials>,
}

impl Request {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials: Arc::new(Credentials {
                username: username.into(),
                password: password.into(),
            }),
        }
    }

    /// The Mantis account name calls are made as.
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Prepends the credentials and invokes the transport.
    async fn call(&self, operation: &'static str, params: Params) -> Result<XmlNode> {
        let mut full: Params = Vec::with_capacity(params.len() + 2);
        full.push(("username", self.credentials.username.as_str().into()));
        full.push(("password", self.credentials.password.as_str().into()));
        full.extend(params);

        self.transport.call(operation, full).await
    }

    // ---- Issues ----

    /// Submits a new issue.
    ///
    /// # Arguments
    ///
    /// * `issue` - The issue to submit. Summary and description are
    ///   required; any attached notes must have text.
    ///
    /// # Returns
    ///
    /// The id the service assigned to the issue.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if a required field is blank,
    /// `MantisError::RemoteFault` if the service rejects the issue (for
    /// example an unknown project or category).
    pub async fn add_issue(&self, issue: &Issue) -> Result<i64> {
        validate::issue(issue)?;

        let ret = self
            .call("mc_issue_add", vec![("issue", issue.to_wire())])
            .await?;
        ret.as_i64()
    }

    /// Replaces the editable fields of an existing issue.
    ///
    /// The usual flow is `get_issue`, edit the returned value in place,
    /// then `update_issue`.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if `issue.id` is not a real
    /// id or a required field is blank.
    pub async fn update_issue(&self, issue: &Issue) -> Result<bool> {
        validate::positive_id("issue.id", issue.id)?;
        validate::issue(issue)?;

        let ret = self
            .call(
                "mc_issue_update",
                vec![("issueId", issue.id.into()), ("issue", issue.to_wire())],
            )
            .await?;
        ret.as_bool()
    }

    /// Records a source-control checkin against an issue, optionally
    /// resolving it as fixed.
    pub async fn checkin_issue(&self, issue_id: i64, comment: &str, fixed: bool) -> Result<bool> {
        validate::positive_id("issue_id", issue_id)?;
        validate::required_text("comment", comment)?;

        let ret = self
            .call(
                "mc_issue_checkin",
                vec![
                    ("issue_id", issue_id.into()),
                    ("comment", comment.into()),
                    ("fixed", fixed.into()),
                ],
            )
            .await?;
        ret.as_bool()
    }

    /// Deletes an issue.
    pub async fn delete_issue(&self, issue_id: i64) -> Result<()> {
        validate::positive_id("issue_id", issue_id)?;
        self.call("mc_issue_delete", vec![("issue_id", issue_id.into())])
            .await?;
        Ok(())
    }

    /// Returns true if an issue with this id exists and is visible to the account.
    pub async fn issue_exists(&self, issue_id: i64) -> Result<bool> {
        validate::positive_id("issue_id", issue_id)?;
        let ret = self
            .call("mc_issue_exists", vec![("issue_id", issue_id.into())])
            .await?;
        ret.as_bool()
    }

    /// Fetches an issue with its notes, attachments and relationships.
    ///
    /// # Arguments
    ///
    /// * `issue_id` - The issue id (1 or above)
    ///
    /// # Returns
    ///
    /// `None` if the service answered with a null issue.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` for ids below 1,
    /// `MantisError::RemoteFault` if the issue does not exist or is not
    /// accessible.
    pub async fn get_issue(&self, issue_id: i64) -> Result<Option<Issue>> {
        validate::positive_id("issue_id", issue_id)?;

        let ret = self
            .call("mc_issue_get", vec![("issue_id", issue_id.into())])
            .await?;

        if ret.is_nil() || (ret.children.is_empty() && ret.text.trim().is_empty()) {
            return Ok(None);
        }
        Issue::from_wire(&ret).map(Some)
    }

    /// Looks up an issue id by its exact summary.
    ///
    /// # Returns
    ///
    /// The matching id, or 0 if no issue has that summary.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the summary is blank or
    /// longer than 128 characters after trimming.
    pub async fn get_issue_id_from_summary(&self, summary: &str) -> Result<i64> {
        let summary = validate::summary(summary)?;
        let ret = self
            .call(
                "mc_issue_get_id_from_summary",
                vec![("summary", summary.into())],
            )
            .await?;
        ret.as_i64()
    }

    /// Returns the highest issue id in a project.
    ///
    /// Pass `Project::ALL_PROJECTS` to search every project or
    /// `Project::DEFAULT_PROJECT` for the account's default project.
    pub async fn get_last_issue_id(&self, project_id: i64) -> Result<i64> {
        validate::project_id(project_id)?;
        let ret = self
            .call(
                "mc_issue_get_biggest_id",
                vec![("project_id", project_id.into())],
            )
            .await?;
        ret.as_i64()
    }

    /// Lists one page of issues across all projects.
    pub async fn get_all_issues(&self, page_number: i64, per_page: i64) -> Result<Vec<Issue>> {
        self.get_project_issues(Project::ALL_PROJECTS, page_number, per_page)
            .await
    }

    /// Lists one page of issues in a project. Pages start at 1.
    pub async fn get_project_issues(
        &self,
        project_id: i64,
        page_number: i64,
        per_page: i64,
    ) -> Result<Vec<Issue>> {
        validate::project_id(project_id)?;
        validate::paging(page_number, per_page)?;

        let ret = self
            .call(
                "mc_project_get_issues",
                vec![
                    ("project_id", project_id.into()),
                    ("page_number", page_number.into()),
                    ("per_page", per_page.into()),
                ],
            )
            .await?;
        Issue::from_wire_array(&ret)
    }

    // ---- Projects and filters ----

    /// Returns the projects the account can see, each with its subprojects.
    pub async fn get_user_accessible_projects(&self) -> Result<Vec<Project>> {
        let ret = self
            .call("mc_projects_get_user_accessible", Vec::new())
            .await?;
        Project::from_wire_array(&ret)
    }

    /// Returns the saved filters available for a project.
    pub async fn get_filters(&self, project_id: i64) -> Result<Vec<Filter>> {
        validate::project_id(project_id)?;
        let ret = self
            .call("mc_filter_get", vec![("project_id", project_id.into())])
            .await?;
        Filter::from_wire_array(&ret)
    }

    /// Runs a saved filter and returns one page of matching issues.
    pub async fn get_issues_by_filter(
        &self,
        project_id: i64,
        filter_id: i64,
        page_number: i64,
        per_page: i64,
    ) -> Result<Vec<Issue>> {
        validate::project_id(project_id)?;
        validate::positive_id("filter_id", filter_id)?;
        validate::paging(page_number, per_page)?;

        let ret = self
            .call(
                "mc_filter_get_issues",
                vec![
                    ("project_id", project_id.into()),
                    ("filter_id", filter_id.into()),
                    ("page_number", page_number.into()),
                    ("per_page", per_page.into()),
                ],
            )
            .await?;
        Issue::from_wire_array(&ret)
    }

    /// Creates a project and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the project name is blank.
    pub async fn add_project(&self, project: &Project) -> Result<i64> {
        validate::required_text("project.name", &project.name)?;
        let ret = self
            .call("mc_project_add", vec![("project", project.to_wire())])
            .await?;
        ret.as_i64()
    }

    /// Deletes a project. The sentinels 0 and -1 are rejected.
    pub async fn delete_project(&self, project_id: i64) -> Result<()> {
        validate::positive_id("project_id", project_id)?;
        self.call("mc_project_delete", vec![("project_id", project_id.into())])
            .await?;
        Ok(())
    }

    // ---- Versions and categories ----

    /// Adds a version to a project and returns the new version id.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the version already has an
    /// id, its name is missing or blank, or its description is missing.
    pub async fn add_project_version(&self, version: &ProjectVersion) -> Result<i64> {
        validate::new_version(version)?;
        let ret = self
            .call(
                "mc_project_version_add",
                vec![("version", version.to_wire())],
            )
            .await?;
        ret.as_i64()
    }

    /// Replaces an existing version.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the version has no id, its
    /// name is missing or blank, or its description is missing.
    pub async fn update_project_version(&self, version: &ProjectVersion) -> Result<()> {
        validate::existing_version(version)?;
        self.call(
            "mc_project_version_update",
            vec![
                ("version_id", version.id.into()),
                ("version", version.to_wire()),
            ],
        )
        .await?;
        Ok(())
    }

    /// Deletes a version.
    pub async fn delete_project_version(&self, version_id: i64) -> Result<()> {
        validate::positive_id("version_id", version_id)?;
        self.call(
            "mc_project_version_delete",
            vec![("version_id", version_id.into())],
        )
        .await?;
        Ok(())
    }

    /// Returns the category names defined for a project.
    pub async fn get_categories(&self, project_id: i64) -> Result<Vec<String>> {
        validate::project_id(project_id)?;
        let ret = self
            .call(
                "mc_project_get_categories",
                vec![("project_id", project_id.into())],
            )
            .await?;
        Ok(ret.items().map(|item| item.text.clone()).collect())
    }

    /// Returns all versions of a project.
    pub async fn get_versions(&self, project_id: i64) -> Result<Vec<ProjectVersion>> {
        self.versions("mc_project_get_versions", project_id).await
    }

    /// Returns the released versions of a project.
    pub async fn get_released_versions(&self, project_id: i64) -> Result<Vec<ProjectVersion>> {
        self.versions("mc_project_get_released_versions", project_id)
            .await
    }

    /// Returns the versions of a project not yet released.
    pub async fn get_unreleased_versions(&self, project_id: i64) -> Result<Vec<ProjectVersion>> {
        self.versions("mc_project_get_unreleased_versions", project_id)
            .await
    }

    async fn versions(
        &self,
        operation: &'static str,
        project_id: i64,
    ) -> Result<Vec<ProjectVersion>> {
        validate::project_id(project_id)?;
        let ret = self
            .call(operation, vec![("project_id", project_id.into())])
            .await?;
        ProjectVersion::from_wire_array(&ret)
    }

    // ---- Notes ----

    /// Adds a note to an issue and returns the note id.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the issue id is below 1 or
    /// the note text is blank.
    pub async fn add_note(&self, issue_id: i64, note: &IssueNote) -> Result<i64> {
        validate::positive_id("issue_id", issue_id)?;
        validate::note(note)?;

        let ret = self
            .call(
                "mc_issue_note_add",
                vec![("issue_id", issue_id.into()), ("note", note.to_wire())],
            )
            .await?;
        ret.as_i64()
    }

    /// Deletes a note.
    pub async fn delete_note(&self, issue_note_id: i64) -> Result<()> {
        validate::positive_id("issue_note_id", issue_note_id)?;
        self.call(
            "mc_issue_note_delete",
            vec![("issue_note_id", issue_note_id.into())],
        )
        .await?;
        Ok(())
    }

    // ---- Attachments ----

    /// Uploads bytes as an attachment and returns the attachment id.
    ///
    /// # Arguments
    ///
    /// * `issue_id` - The issue to attach to
    /// * `file_name` - Name shown in Mantis
    /// * `content_type` - MIME type, e.g. `text/plain`
    /// * `content` - File content, sent base64 encoded
    pub async fn add_attachment(
        &self,
        issue_id: i64,
        file_name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<i64> {
        validate::positive_id("issue_id", issue_id)?;
        validate::required_text("file_name", file_name)?;

        tracing::debug!(
            issue_id = issue_id,
            file_name = %file_name,
            size = content.len(),
            "Uploading attachment"
        );

        let ret = self
            .call(
                "mc_issue_attachment_add",
                vec![
                    ("issue_id", issue_id.into()),
                    ("name", file_name.into()),
                    ("file_type", content_type.into()),
                    ("content", SoapValue::Text(STANDARD.encode(content))),
                ],
            )
            .await?;
        ret.as_i64()
    }

    /// Reads a local file and uploads it as an attachment.
    ///
    /// The MIME type is guessed from the file extension, falling back to
    /// `application/octet-stream`. When `file_name` is `None` the file's
    /// own name is used.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` for an empty path or a path
    /// without a file name, `MantisError::Io` if the file cannot be read.
    pub async fn add_attachment_from_file(
        &self,
        issue_id: i64,
        path: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<i64> {
        let path = path.as_ref();
        validate::positive_id("issue_id", issue_id)?;
        if path.as_os_str().is_empty() {
            return Err(MantisError::invalid("file_path", InvalidReason::Missing));
        }

        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| MantisError::invalid("file_path", InvalidReason::Missing))?,
        };
        validate::required_text("file_name", &file_name)?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let content = tokio::fs::read(path).await?;

        self.add_attachment(issue_id, &file_name, &content_type, &content)
            .await
    }

    /// Deletes an attachment.
    pub async fn delete_attachment(&self, attachment_id: i64) -> Result<()> {
        validate::positive_id("attachment_id", attachment_id)?;
        self.call(
            "mc_issue_attachment_delete",
            vec![("issue_attachment_id", attachment_id.into())],
        )
        .await?;
        Ok(())
    }

    /// Downloads an attachment's content.
    pub async fn get_attachment(&self, attachment_id: i64) -> Result<Vec<u8>> {
        validate::positive_id("attachment_id", attachment_id)?;
        let ret = self
            .call(
                "mc_issue_attachment_get",
                vec![("issue_attachment_id", attachment_id.into())],
            )
            .await?;

        let encoded: String = ret.text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(encoded)
            .map_err(|e| MantisError::decode(format!("attachment content is not base64: {}", e)))
    }

    // ---- Configuration ----

    /// Reads a configuration value from the server.
    ///
    /// Only options the server exposes can be read; protected ones answer
    /// with a fault. Prefer `ConfigCache::get_string`, which remembers values.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::InvalidArgument` if the name is blank or
    /// contains a space.
    pub async fn get_config_string(&self, config_name: &str) -> Result<String> {
        validate::config_name(config_name)?;
        let ret = self
            .call(
                "mc_config_get_string",
                vec![("config_var", config_name.into())],
            )
            .await?;
        Ok(ret.text)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("username", &self.credentials.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
