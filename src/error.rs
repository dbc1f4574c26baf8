//! Error types for the MantisConnect client.
//!
//! This module defines `MantisError`, the unified error type returned by
//! every operation in the crate. Callers pattern-match on the variant (or on
//! [`ErrorKind`]) rather than on concrete error sources.
//!
//! # Security
//!
//! Passwords are never included in error messages. Use `sanitize_message()`
//! when building a message from text that may echo request content.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a locally validated argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// A required value was absent or blank.
    Missing,
    /// A numeric value was outside the accepted range.
    OutOfRange,
    /// A string exceeded the accepted length.
    TooLong,
    /// A string contained a character the service does not accept.
    DisallowedCharacter,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Missing => "is required",
            InvalidReason::OutOfRange => "is out of range",
            InvalidReason::TooLong => "is too long",
            InvalidReason::DisallowedCharacter => "contains a disallowed character",
        };
        f.write_str(text)
    }
}

/// Broad classification of a [`MantisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    InvalidArgument,
    /// The service received the call and returned a SOAP fault.
    RemoteFault,
    /// The service could not be reached or did not answer properly.
    Transport,
    /// A configuration value from the service could not be decoded.
    Format,
    /// The service answered with a body that does not match the protocol.
    Decode,
    /// Local configuration is missing or invalid.
    Config,
    /// A local file could not be read.
    Io,
}

/// Unified error type for all MantisConnect operations.
#[derive(Error, Debug)]
pub enum MantisError {
    /// An argument failed client-side validation.
    #[error("invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter (e.g. `issue_id`, `issue.summary`).
        parameter: &'static str,
        /// What was wrong with it.
        reason: InvalidReason,
    },

    /// The service returned a SOAP fault.
    #[error("remote fault ({code}): {message}")]
    RemoteFault {
        /// The SOAP `faultcode`, e.g. `SOAP-ENV:Client`.
        code: String,
        /// The server-provided `faultstring`, verbatim.
        message: String,
    },

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response was neither a success nor a SOAP fault.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The (truncated) response body.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The SOAP operation that timed out.
        operation: String,
    },

    /// The HTTP transport credential was rejected (HTTP 401).
    #[error("HTTP authentication failed - check the transport credential")]
    Authentication,

    /// An enumeration string from the service is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading a local attachment file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MantisError {
    /// Creates an invalid-argument error.
    pub fn invalid(parameter: &'static str, reason: InvalidReason) -> Self {
        MantisError::InvalidArgument { parameter, reason }
    }

    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        MantisError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MantisError::Config(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        MantisError::Decode(message.into())
    }

    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        MantisError::Format(message.into())
    }

    /// Creates a remote fault.
    pub fn remote_fault(code: impl Into<String>, message: impl Into<String>) -> Self {
        MantisError::RemoteFault {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the broad category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MantisError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            MantisError::RemoteFault { .. } => ErrorKind::RemoteFault,
            MantisError::Http(_)
            | MantisError::HttpClient(_)
            | MantisError::HttpStatus { .. }
            | MantisError::Timeout { .. }
            | MantisError::Authentication => ErrorKind::Transport,
            MantisError::Format(_) => ErrorKind::Format,
            MantisError::Decode(_) => ErrorKind::Decode,
            MantisError::Config(_) => ErrorKind::Config,
            MantisError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the error was raised before any network call.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Returns true if the service rejected the call with a SOAP fault.
    #[must_use]
    pub fn is_remote_fault(&self) -> bool {
        self.kind() == ErrorKind::RemoteFault
    }

    /// Returns true if the call could not reach the service.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Sanitizes a message to remove any occurrence of a secret.
    ///
    /// Passwords are sent as plain SOAP parameters, so any text that may
    /// echo the request (server error pages, reqwest errors) goes through
    /// here before it is logged or stored in an error.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `secret` - The secret to strip from the message
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MantisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = MantisError::invalid("issue_id", InvalidReason::OutOfRange);
        assert_eq!(err.to_string(), "invalid argument `issue_id`: is out of range");
        assert!(err.is_invalid_argument());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_remote_fault_keeps_server_message() {
        let err = MantisError::remote_fault("SOAP-ENV:Client", "Issue '42' does not exist.");
        assert!(err.is_remote_fault());
        assert!(err.to_string().contains("Issue '42' does not exist."));
    }

    #[test]
    fn test_missing_env_error() {
        let err = MantisError::missing_env("MANTIS_PASSWORD");
        assert!(err.to_string().contains("MANTIS_PASSWORD"));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_timeout_is_transport() {
        let err = MantisError::Timeout {
            duration: Duration::from_secs(30),
            operation: "mc_issue_get".to_string(),
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_authentication_is_transport() {
        assert_eq!(MantisError::Authentication.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_format_kind() {
        assert_eq!(MantisError::format("bad").kind(), ErrorKind::Format);
        assert_eq!(MantisError::decode("bad").kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_sanitize_message_removes_secret() {
        let sanitized =
            MantisError::sanitize_message("<password>hunter2</password>", "hunter2");
        assert!(!sanitized.contains("hunter2"));
        assert!(sanitized.contains("[REDACTED]"));
    }

    #[test]
    fn test_sanitize_message_empty_secret() {
        let message = "Some error message";
        assert_eq!(MantisError::sanitize_message(message, ""), message);
    }
}
