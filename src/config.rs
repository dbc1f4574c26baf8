//! Connection settings for a MantisConnect session.
//!
//! Settings can be built directly or loaded from environment variables,
//! with validation to ensure the endpoint is a usable HTTP(S) URL.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::MantisError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP Basic credential for servers behind web-server authentication.
///
/// This is separate from the Mantis account: it authenticates the HTTP
/// connection, while the Mantis username/password go inside every call.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpCredential {
    /// HTTP user name.
    pub username: String,

    /// HTTP password. Never logged.
    pub password: String,
}

impl HttpCredential {
    /// Creates a new HTTP Basic credential.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for HttpCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCredential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for connecting to a Mantis installation.
#[derive(Clone)]
pub struct SessionConfig {
    /// Mantis base URL (e.g. `https://bugs.example.com/mantis/`) or the
    /// full `mantisconnect.php` endpoint.
    pub url: String,

    /// Mantis account name.
    pub username: String,

    /// Mantis account password.
    /// This value must never be logged or included in error messages.
    pub password: String,

    /// Optional HTTP Basic credential.
    pub http_credential: Option<HttpCredential>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Creates a configuration with the default timeout and no HTTP credential.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            http_credential: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the HTTP Basic credential.
    pub fn with_http_credential(mut self, credential: HttpCredential) -> Self {
        self.http_credential = Some(credential);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `MANTIS_URL`: Mantis base URL or `mantisconnect.php` endpoint
    /// - `MANTIS_USERNAME`: Mantis account name
    /// - `MANTIS_PASSWORD`: Mantis account password
    ///
    /// # Optional Environment Variables
    ///
    /// - `MANTIS_HTTP_USERNAME` / `MANTIS_HTTP_PASSWORD`: HTTP Basic credential
    /// - `MANTIS_TIMEOUT_SECS`: request timeout (default 30)
    ///
    /// # Errors
    ///
    /// Returns `MantisError::Config` if any required variable is missing
    /// or if values fail validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = SessionConfig::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, MantisError> {
        let url = Self::get_required_env("MANTIS_URL")?;
        let username = Self::get_required_env("MANTIS_USERNAME")?;
        let password =
            env::var("MANTIS_PASSWORD").map_err(|_| MantisError::missing_env("MANTIS_PASSWORD"))?;

        let mut config = Self::new(url.trim(), username.trim(), password);

        if let Ok(http_username) = env::var("MANTIS_HTTP_USERNAME") {
            if !http_username.trim().is_empty() {
                let http_password = env::var("MANTIS_HTTP_PASSWORD").unwrap_or_default();
                config = config
                    .with_http_credential(HttpCredential::new(http_username.trim(), http_password));
            }
        }

        if let Ok(timeout) = env::var("MANTIS_TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                MantisError::invalid_config("MANTIS_TIMEOUT_SECS must be a whole number of seconds")
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns `MantisError::Config` if the URL is not an absolute
    /// `http://` or `https://` URL, or the timeout is zero.
    pub fn validate(&self) -> Result<(), MantisError> {
        let url = self.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(MantisError::invalid_config(
                "Mantis URL must start with http:// or https://",
            ));
        }
        Url::parse(url)
            .map_err(|e| MantisError::invalid_config(format!("invalid Mantis URL: {}", e)))?;

        if self.timeout.is_zero() {
            return Err(MantisError::invalid_config("timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Replaces both passwords in `text` with a placeholder.
    pub(crate) fn redact(&self, text: &str) -> String {
        let text = MantisError::sanitize_message(text, &self.password);
        match &self.http_credential {
            Some(credential) => MantisError::sanitize_message(&text, &credential.password),
            None => text,
        }
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, MantisError> {
        env::var(name)
            .map_err(|_| MantisError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(MantisError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("http_credential", &self.http_credential)
            .field("timeout", &self.timeout)
            .finish()
    }
}
