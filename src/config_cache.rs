//! Per-session cache of server configuration values.
//!
//! Configuration options such as `status_enum_string` change rarely, so
//! each one is fetched at most once per session. Names are matched
//! case-insensitively. Failed lookups are not cached.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::enumeration::MantisEnum;
use crate::error::Result;
use crate::request::Request;

/// Read-through cache over `Request::get_config_string`.
///
/// The map lock is held across the remote fetch on a miss, so concurrent
/// lookups of an uncached name issue a single call.
pub struct ConfigCache {
    request: Request,
    values: Mutex<HashMap<String, String>>,
}

impl ConfigCache {
    pub(crate) fn new(request: Request) -> Self {
        Self {
            request,
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a configuration value, fetching it on first use.
    ///
    /// # Arguments
    ///
    /// * `name` - Configuration option name, e.g. `status_enum_string`
    ///
    /// # Errors
    ///
    /// Propagates any error from `Request::get_config_string` unchanged.
    pub async fn get_string(&self, name: &str) -> Result<String> {
        let key = name.to_lowercase();
        let mut values = self.values.lock().await;

        if let Some(value) = values.get(&key) {
            tracing::trace!(config = %key, "Configuration cache hit");
            return Ok(value.clone());
        }

        tracing::debug!(config = %key, "Fetching configuration value");
        let value = self.request.get_config_string(name).await?;
        values.insert(key, value.clone());
        Ok(value)
    }

    /// Returns the enumeration stored in `<name>_enum_string`.
    ///
    /// The string is cached; the returned `MantisEnum` is decoded fresh
    /// on every call.
    ///
    /// # Errors
    ///
    /// `MantisError::Format` if the stored string is malformed, otherwise
    /// whatever `get_string` returns.
    pub async fn get_enum(&self, name: &str) -> Result<MantisEnum> {
        let source = self.get_string(&format!("{}_enum_string", name)).await?;
        MantisEnum::parse(&source)
    }

    /// Access levels (viewer, reporter, developer, ...).
    pub async fn access_levels_enum(&self) -> Result<MantisEnum> {
        self.get_enum("access_levels").await
    }

    /// Issue priorities.
    pub async fn priority_enum(&self) -> Result<MantisEnum> {
        self.get_enum("priority").await
    }

    /// Issue severities.
    pub async fn severity_enum(&self) -> Result<MantisEnum> {
        self.get_enum("severity").await
    }

    /// Issue reproducibility values.
    pub async fn reproducibility_enum(&self) -> Result<MantisEnum> {
        self.get_enum("reproducibility").await
    }

    /// View states (public, private).
    pub async fn view_state_enum(&self) -> Result<MantisEnum> {
        self.get_enum("view_state").await
    }

    /// ETA values.
    pub async fn eta_enum(&self) -> Result<MantisEnum> {
        self.get_enum("eta").await
    }

    /// Projection values.
    pub async fn projection_enum(&self) -> Result<MantisEnum> {
        self.get_enum("projection").await
    }

    /// Resolutions.
    pub async fn resolution_enum(&self) -> Result<MantisEnum> {
        self.get_enum("resolution").await
    }

    /// Workflow statuses.
    pub async fn status_enum(&self) -> Result<MantisEnum> {
        self.get_enum("status").await
    }

    /// Number of distinct names currently cached.
    pub async fn cached_len(&self) -> usize {
        self.values.lock().await.len()
    }
}
