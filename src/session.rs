//! Session: one connection to one Mantis installation.
//!
//! A [`Session`] owns the gateway and the configuration cache. Building
//! one performs no network I/O; call [`Session::connect`] to verify the
//! endpoint and credentials up front.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::config_cache::ConfigCache;
use crate::error::Result;
use crate::request::Request;
use crate::soap_client::{SoapClient, Transport};

/// Path of the SOAP endpoint below a Mantis installation.
const ENDPOINT_PATH: &str = "api/soap/mantisconnect.php";

/// A Mantis session.
///
/// # Example
///
/// ```ignore
/// let session = Session::new(SessionConfig::from_env()?)?;
/// session.connect().await?;
///
/// let priorities = session.config().priority_enum().await?;
/// let issue = session.request().get_issue(42).await?;
/// ```
pub struct Session {
    url: String,
    settings: SessionConfig,
    request: Request,
    cache: ConfigCache,
}

impl Session {
    /// Creates a session that talks HTTP to the configured server.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::Config` if the URL is invalid and
    /// `MantisError::HttpClient` if the HTTP client cannot be built.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let url = normalize_url(&config.url);
        let client = SoapClient::new(url.clone(), &config)?;
        Ok(Self::assemble(config, url, Arc::new(client)))
    }

    /// Creates a session over an arbitrary transport.
    pub fn with_transport(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let url = normalize_url(&config.url);
        Self::assemble(config, url, transport)
    }

    fn assemble(settings: SessionConfig, url: String, transport: Arc<dyn Transport>) -> Self {
        let request = Request::new(transport, settings.username.clone(), settings.password.clone());
        let cache = ConfigCache::new(request.clone());
        Self {
            url,
            settings,
            request,
            cache,
        }
    }

    /// Verifies connectivity and credentials by fetching the status enumeration.
    ///
    /// # Errors
    ///
    /// Returns whatever the call failed with, unchanged.
    pub async fn connect(&self) -> Result<()> {
        tracing::debug!(url = %self.url, "Connecting to Mantis");

        match self.cache.status_enum().await {
            Ok(status) => {
                tracing::info!(
                    url = %self.url,
                    username = %self.settings.username,
                    statuses = status.len(),
                    "Connected to Mantis"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.url,
                    error = %self.settings.redact(&e.to_string()),
                    "Connection to Mantis failed"
                );
                Err(e)
            }
        }
    }

    /// Normalized endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Mantis account name.
    pub fn username(&self) -> &str {
        &self.settings.username
    }

    /// The settings this session was built from.
    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    /// The operation gateway.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The configuration cache.
    pub fn config(&self) -> &ConfigCache {
        &self.cache
    }
}

/// Turns a Mantis base URL into the SOAP endpoint URL.
///
/// URLs already pointing at `mantisconnect.php` are returned unchanged.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("mantisconnect.php") {
        return url.to_string();
    }
    if url.ends_with('/') {
        format!("{}{}", url, ENDPOINT_PATH)
    } else {
        format!("{}/{}", url, ENDPOINT_PATH)
    }
}
