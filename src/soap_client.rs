//! SOAP transport for the MantisConnect endpoint.
//!
//! [`Transport`] is the seam between the typed gateway and the wire: it
//! takes an operation name and its parameters and returns the decoded
//! `return` element. [`SoapClient`] is the HTTP implementation.
//!
//! # Errors
//!
//! Every call is attempted exactly once. SOAP faults surface as
//! `MantisError::RemoteFault` with the server text untouched; everything
//! else that goes wrong on the wire is a transport error.
//!
//! # Security
//!
//! The Mantis password travels inside every envelope, so request bodies
//! are never logged and response text is sanitized before it is logged
//! or stored in an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::config::{HttpCredential, SessionConfig};
use crate::error::{MantisError, Result};
use crate::wire::{build_envelope, read_response, Params, XmlNode, MANTIS_NAMESPACE};

/// Content type for SOAP 1.1 requests.
const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Maximum length for HTTP error bodies kept in `MantisError::HttpStatus`.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Executes a single MantisConnect operation.
///
/// Implementations must be usable from several tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invokes `operation` with `params` (already including credentials)
    /// and returns the operation's `return` element.
    ///
    /// # Errors
    ///
    /// `MantisError::RemoteFault` for SOAP faults, a transport error when
    /// the service cannot be reached, `MantisError::Decode` when the
    /// response is not a SOAP envelope.
    async fn call(&self, operation: &str, params: Params) -> Result<XmlNode>;
}

/// HTTP client for the MantisConnect SOAP endpoint.
///
/// # Example
///
/// ```ignore
/// let config = SessionConfig::new("http://bugs.example.com/", "admin", "secret");
/// let client = SoapClient::new("http://bugs.example.com/api/soap/mantisconnect.php", &config)?;
/// ```
#[derive(Clone)]
pub struct SoapClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Full URL of `mantisconnect.php`.
    endpoint: String,

    /// Optional HTTP Basic credential.
    http_credential: Option<HttpCredential>,

    /// Timeout applied to every request.
    timeout: Duration,

    /// Mantis password, kept only to strip it from logged text.
    /// SECURITY: Never log this value!
    secret: String,
}

impl SoapClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full `mantisconnect.php` URL
    /// * `config` - Session settings (timeout, credentials)
    ///
    /// # Errors
    ///
    /// Returns `MantisError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(endpoint: impl Into<String>, config: &SessionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MantisError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            http_credential: config.http_credential.clone(),
            timeout: config.timeout,
            secret: config.password.clone(),
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn sanitize(&self, text: &str) -> String {
        let text = MantisError::sanitize_message(text, &self.secret);
        match &self.http_credential {
            Some(credential) => MantisError::sanitize_message(&text, &credential.password),
            None => text,
        }
    }

    /// Converts a non-SOAP HTTP failure into a `MantisError`.
    fn status_error(&self, status: StatusCode, body: &str) -> MantisError {
        if status == StatusCode::UNAUTHORIZED {
            return MantisError::Authentication;
        }

        let body = self.sanitize(body);
        let body = if body.chars().count() > MAX_ERROR_BODY_LEN {
            let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
            format!("{}...[truncated]", truncated)
        } else {
            body
        };

        MantisError::HttpStatus { status, body }
    }
}

#[async_trait]
impl Transport for SoapClient {
    async fn call(&self, operation: &str, params: Params) -> Result<XmlNode> {
        tracing::debug!(
            operation = operation,
            endpoint = %self.endpoint,
            "Making MantisConnect call"
        );

        let envelope = build_envelope(operation, &params);

        let mut req = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", format!("{}#{}", MANTIS_NAMESPACE, operation))
            .body(envelope);

        if let Some(credential) = &self.http_credential {
            req = req.basic_auth(&credential.username, Some(&credential.password));
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return MantisError::Timeout {
                    duration: self.timeout,
                    operation: operation.to_string(),
                };
            }
            MantisError::Http(e)
        })?;
        let status = response.status();

        let body = response.text().await.map_err(MantisError::Http)?;

        tracing::trace!(
            operation = operation,
            status = %status,
            body = %self.sanitize(&body),
            "MantisConnect response"
        );

        match read_response(&body) {
            Ok(result) if status.is_success() => Ok(result),
            Err(MantisError::RemoteFault { code, message }) => {
                tracing::warn!(
                    operation = operation,
                    fault_code = %code,
                    "MantisConnect returned a fault"
                );
                Err(MantisError::RemoteFault { code, message })
            }
            Err(e) if status.is_success() => Err(e),
            _ => Err(self.status_error(status, &body)),
        }
    }
}
