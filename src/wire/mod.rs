//! SOAP wire format for the MantisConnect web service.
//!
//! Outbound parameters are described with [`SoapValue`] and rendered into a
//! SOAP 1.1 envelope. Responses are parsed into a namespace-stripped
//! [`XmlNode`] tree that the entity models read from.

mod envelope;
mod xml;

pub use envelope::*;
pub use xml::*;
