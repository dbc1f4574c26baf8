//! Client-side argument checks run before any remote call.
//!
//! Every failure is `MantisError::InvalidArgument` naming the parameter,
//! so callers can tell which argument was rejected without parsing text.

use crate::error::{InvalidReason, MantisError, Result};
use crate::models::{Issue, IssueNote, ProjectVersion};

/// Longest summary accepted by `get_issue_id_from_summary`.
pub const MAX_SUMMARY_LEN: usize = 128;

fn invalid<T>(parameter: &'static str, reason: InvalidReason) -> Result<T> {
    Err(MantisError::invalid(parameter, reason))
}

/// Accepts ids of 1 and above.
pub(crate) fn positive_id(parameter: &'static str, id: i64) -> Result<()> {
    if id < 1 {
        return invalid(parameter, InvalidReason::OutOfRange);
    }
    Ok(())
}

/// Accepts real project ids plus the `0` (all) and `-1` (default) sentinels.
pub(crate) fn project_id(id: i64) -> Result<()> {
    if id < -1 {
        return invalid("project_id", InvalidReason::OutOfRange);
    }
    Ok(())
}

/// Page numbers and page sizes both start at 1.
pub(crate) fn paging(page_number: i64, per_page: i64) -> Result<()> {
    positive_id("page_number", page_number)?;
    positive_id("per_page", per_page)
}

/// Rejects text that is empty after trimming.
pub(crate) fn required_text(parameter: &'static str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return invalid(parameter, InvalidReason::Missing);
    }
    Ok(())
}

pub(crate) fn issue(issue: &Issue) -> Result<()> {
    required_text("issue.summary", &issue.summary)?;
    required_text("issue.description", &issue.description)?;
    issue.notes.iter().try_for_each(note)
}

pub(crate) fn note(note: &IssueNote) -> Result<()> {
    required_text("note.text", &note.text)
}

/// Validates a summary search string and returns it trimmed.
pub(crate) fn summary(summary: &str) -> Result<&str> {
    let trimmed = summary.trim();
    if trimmed.is_empty() {
        return invalid("summary", InvalidReason::Missing);
    }
    if trimmed.chars().count() > MAX_SUMMARY_LEN {
        return invalid("summary", InvalidReason::TooLong);
    }
    Ok(trimmed)
}

pub(crate) fn config_name(name: &str) -> Result<()> {
    required_text("config_name", name)?;
    if name.contains(' ') {
        return invalid("config_name", InvalidReason::DisallowedCharacter);
    }
    Ok(())
}

/// A version to add must not carry an id yet.
pub(crate) fn new_version(version: &ProjectVersion) -> Result<()> {
    if version.id != 0 {
        return invalid("version.id", InvalidReason::OutOfRange);
    }
    version_fields(version)
}

pub(crate) fn existing_version(version: &ProjectVersion) -> Result<()> {
    positive_id("version.id", version.id)?;
    version_fields(version)
}

/// A version name that is only whitespace counts as missing.
fn version_fields(version: &ProjectVersion) -> Result<()> {
    project_id(version.project_id)?;
    match version.name.as_deref() {
        Some(name) if !name.trim().is_empty() => {}
        _ => return invalid("version.name", InvalidReason::Missing),
    }
    if version.description.is_none() {
        return invalid("version.description", InvalidReason::Missing);
    }
    Ok(())
}
