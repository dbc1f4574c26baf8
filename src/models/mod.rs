//! Entity models for the MantisConnect API.
//!
//! Each model is a plain value decoded from (and, where the service
//! accepts it, encoded to) the SOAP wire representation. Models hold no
//! reference to the session that produced them.

mod attachment;
mod filter;
mod issue;
pub mod multiline;
mod note;
mod object_ref;
mod project;
mod user;

pub use attachment::*;
pub use filter::*;
pub use issue::*;
pub use note::*;
pub use object_ref::*;
pub use project::*;
pub use user::*;
