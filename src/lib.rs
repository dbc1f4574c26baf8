//! # mantisconnect
//!
//! An async client for the MantisBT SOAP web service (MantisConnect).
//!
//! ## Features
//!
//! - **Issues**: add, update, delete, fetch, page through and check in
//! - **Projects**: accessible project trees, versions, categories, filters
//! - **Notes and attachments**: add and remove notes, upload and download files
//! - **Configuration**: cached server configuration and enumeration decoding
//! - **Security**: passwords are never logged or exposed in error messages
//!
//! ## Architecture
//!
//! - [`session`] - Entry point owning the gateway and configuration cache
//! - [`request`] - Typed gateway for every remote operation
//! - [`config_cache`] - Per-session cache of server configuration values
//! - [`enumeration`] - Decoder for `code:label` enumeration strings
//! - [`models`] - Issues, projects, notes and the other entities
//! - [`soap_client`] - The [`Transport`] seam and its HTTP implementation
//! - [`wire`] - SOAP envelopes and XML decoding
//! - [`config`] - Connection settings, loadable from the environment
//! - [`error`] - Error types with message sanitization
//!
//! ## Configuration
//!
//! [`SessionConfig::from_env`] reads:
//!
//! - `MANTIS_URL`: Mantis base URL or `mantisconnect.php` endpoint
//! - `MANTIS_USERNAME` / `MANTIS_PASSWORD`: Mantis account
//!
//! Optional:
//! - `MANTIS_HTTP_USERNAME` / `MANTIS_HTTP_PASSWORD`: HTTP Basic credential
//! - `MANTIS_TIMEOUT_SECS`: request timeout (default 30)
//! - `RUST_LOG`: log level for the binary (e.g., `mantisconnect=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use mantisconnect::{Issue, ObjectRef, Session, SessionConfig};
//!
//! async fn example() -> Result<(), mantisconnect::MantisError> {
//!     let session = Session::new(SessionConfig::from_env()?)?;
//!     session.connect().await?;
//!
//!     let priorities = session.config().priority_enum().await?;
//!     let issue = Issue::new("Crash on save", "Saving a large file crashes.")
//!         .with_project(ObjectRef::from_id(1))
//!         .with_category(ObjectRef::from_name("General"))
//!         .with_priority(priorities.object_ref(priorities.code("high")));
//!
//!     let id = session.request().add_issue(&issue).await?;
//!     println!("submitted #{}", id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod config_cache;
pub mod enumeration;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod soap_client;
mod validate;
pub mod wire;

#[cfg(test)]
mod testing;

pub use config::{HttpCredential, SessionConfig};
pub use config_cache::ConfigCache;
pub use enumeration::MantisEnum;
pub use error::{ErrorKind, InvalidReason, MantisError, Result};
pub use models::{
    Attachment, Filter, Issue, IssueNote, IssueRelationship, ObjectRef, Project, ProjectVersion,
    User,
};
pub use request::Request;
pub use session::Session;
pub use soap_client::{SoapClient, Transport};
pub use validate::MAX_SUMMARY_LEN;
