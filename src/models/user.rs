//! Account models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::wire::{SoapValue, XmlNode};

/// A Mantis user account (`AccountData` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: i64,

    /// Login name.
    pub name: String,

    /// Real name, if the account has one.
    pub real_name: String,

    /// Email address, if visible to the caller.
    pub email: String,
}

impl User {
    /// Creates a user reference by login name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn from_wire(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: node.i64("id")?,
            name: node.string("name"),
            real_name: node.string("real_name"),
            email: node.string("email"),
        })
    }

    pub(crate) fn to_wire(&self) -> SoapValue {
        SoapValue::Struct(vec![
            ("id", self.id.into()),
            ("name", self.name.as_str().into()),
            ("real_name", self.real_name.as_str().into()),
            ("email", self.email.as_str().into()),
        ])
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
