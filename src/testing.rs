//! In-memory [`Transport`] used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{MantisError, Result};
use crate::soap_client::Transport;
use crate::wire::{parse_document, Params, SoapValue, XmlNode};

/// One recorded call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub operation: String,
    pub params: Params,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&SoapValue> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn param_text(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(SoapValue::as_text)
    }
}

/// Records every call and answers from canned responses.
///
/// Operations without a canned response answer with an empty `return`.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<String, XmlNode>>,
    faults: Mutex<HashMap<String, String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `operation` with the given `<return>...</return>` document.
    pub fn respond(self, operation: &str, return_xml: &str) -> Self {
        let node = parse_document(return_xml).expect("canned response must be valid XML");
        self.set_response(operation, node);
        self
    }

    /// Replaces the answer for `operation` after construction.
    pub fn set_response(&self, operation: &str, node: XmlNode) {
        self.responses
            .lock()
            .unwrap()
            .insert(operation.to_string(), node);
    }

    /// Answers `operation` with a SOAP fault carrying `message`.
    pub fn fault(self, operation: &str, message: &str) -> Self {
        self.faults
            .lock()
            .unwrap()
            .insert(operation.to_string(), message.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no calls recorded")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn call(&self, operation: &str, params: Params) -> Result<XmlNode> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: operation.to_string(),
            params,
        });

        if let Some(message) = self.faults.lock().unwrap().get(operation) {
            return Err(MantisError::remote_fault("SOAP-ENV:Server", message.clone()));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(operation)
            .cloned()
            .unwrap_or_else(|| XmlNode::new("return")))
    }
}
