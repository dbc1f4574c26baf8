//! Decoder for Mantis enumeration strings.
//!
//! Mantis stores enumerations such as statuses and priorities as
//! configuration strings of the form `"10:new,20:feedback,30:acknowledged"`.
//! [`MantisEnum`] parses one into a bidirectional code/label lookup.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{MantisError, Result};
use crate::models::ObjectRef;

/// A decoded enumeration.
///
/// Lookups never fail: an unknown code yields the placeholder label
/// `@<code>@` and an unknown label yields code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MantisEnum {
    source: String,
    entries: Vec<(i32, String)>,
    label_to_code: HashMap<String, i32>,
    code_to_label: HashMap<i32, String>,
}

impl MantisEnum {
    /// Parses an enumeration string.
    ///
    /// Segments that are blank after trimming are skipped, so an empty
    /// string yields an empty enumeration.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::Format` when a segment is not exactly
    /// `code:label`, the code is not an integer, the label is blank, or a
    /// code or label appears twice.
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut label_to_code = HashMap::new();
        let mut code_to_label = HashMap::new();

        for segment in source.split(',') {
            if segment.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = segment.split(':').collect();
            if parts.len() != 2 {
                return Err(MantisError::format(format!(
                    "invalid entry '{}' in enumeration '{}'",
                    segment, source
                )));
            }

            let code: i32 = parts[0].trim().parse().map_err(|_| {
                MantisError::format(format!(
                    "invalid code '{}' in enumeration '{}'",
                    parts[0], source
                ))
            })?;

            let label = parts[1].trim();
            if label.is_empty() {
                return Err(MantisError::format(format!(
                    "code '{}' has an empty label in enumeration '{}'",
                    code, source
                )));
            }
            if label_to_code.contains_key(label) {
                return Err(MantisError::format(format!(
                    "label '{}' exists more than once in enumeration '{}'",
                    label, source
                )));
            }
            if code_to_label.contains_key(&code) {
                return Err(MantisError::format(format!(
                    "code '{}' exists more than once in enumeration '{}'",
                    code, source
                )));
            }

            label_to_code.insert(label.to_string(), code);
            code_to_label.insert(code, label.to_string());
            entries.push((code, label.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            entries,
            label_to_code,
            code_to_label,
        })
    }

    /// Returns the label for `code`, or `@<code>@` if unknown.
    pub fn label(&self, code: i32) -> String {
        match self.code_to_label.get(&code) {
            Some(label) => label.clone(),
            None => format!("@{}@", code),
        }
    }

    /// Returns the code for `label`, or 0 if unknown.
    pub fn code(&self, label: &str) -> i32 {
        self.label_to_code.get(label).copied().unwrap_or(0)
    }

    /// Returns true if `code` is defined.
    pub fn contains_code(&self, code: i32) -> bool {
        self.code_to_label.contains_key(&code)
    }

    /// Builds a reference carrying both the code and its label.
    pub fn object_ref(&self, code: i32) -> ObjectRef {
        ObjectRef::new(i64::from(code), self.label(code))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the enumeration has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in source order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, label)| label.as_str())
    }

    /// Codes in source order.
    pub fn codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    /// `(code, label)` pairs in source order.
    pub fn entries(&self) -> &[(i32, String)] {
        &self.entries
    }

    /// The string this enumeration was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for MantisEnum {
    type Err = MantisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
