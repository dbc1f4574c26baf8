//! SOAP 1.1 request envelopes and response unwrapping.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;

use super::xml::{parse_document, XmlNode};
use crate::error::{MantisError, Result};

/// Target namespace of the MantisConnect WSDL.
pub const MANTIS_NAMESPACE: &str = "http://futureware.biz/mantisconnect";

const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An outbound SOAP parameter value.
///
/// The service reads every scalar from element text, so integers and
/// booleans are carried as their decimal / `true`/`false` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapValue {
    /// Element text.
    Text(String),
    /// A complex type: named child elements in order.
    Struct(Vec<(&'static str, SoapValue)>),
    /// A SOAP array: one `item` element per value.
    Array(Vec<SoapValue>),
    /// `xsi:nil="true"`.
    Nil,
}

impl SoapValue {
    /// Encodes an optional timestamp, `Nil` when absent.
    pub fn datetime(value: Option<&DateTime<Utc>>) -> Self {
        match value {
            Some(dt) => SoapValue::Text(dt.to_rfc3339_opts(SecondsFormat::Secs, false)),
            None => SoapValue::Nil,
        }
    }

    /// Returns the field of a struct value by name.
    pub fn field(&self, name: &str) -> Option<&SoapValue> {
        match self {
            SoapValue::Struct(fields) => fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the text of a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SoapValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Renders this value as an element named `name`.
    pub fn write_element(&self, name: &str, out: &mut String) {
        match self {
            SoapValue::Text(text) => {
                out.push('<');
                out.push_str(name);
                out.push('>');
                out.push_str(&escape(text.as_str()));
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            SoapValue::Struct(fields) => {
                out.push('<');
                out.push_str(name);
                out.push('>');
                for (field, value) in fields {
                    value.write_element(field, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            SoapValue::Array(items) => {
                out.push('<');
                out.push_str(name);
                out.push('>');
                for item in items {
                    item.write_element("item", out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            SoapValue::Nil => {
                out.push('<');
                out.push_str(name);
                out.push_str(" xsi:nil=\"true\"/>");
            }
        }
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        SoapValue::Text(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        SoapValue::Text(value)
    }
}

impl From<i64> for SoapValue {
    fn from(value: i64) -> Self {
        SoapValue::Text(value.to_string())
    }
}

impl From<bool> for SoapValue {
    fn from(value: bool) -> Self {
        SoapValue::Text(if value { "true" } else { "false" }.to_string())
    }
}

/// Named parameters of a single SOAP call, in WSDL order.
pub type Params = Vec<(&'static str, SoapValue)>;

/// Builds the SOAP envelope for `operation` with the given parameters.
pub fn build_envelope(operation: &str, params: &[(&'static str, SoapValue)]) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push_str(&format!(
        r#"<soapenv:Envelope xmlns:soapenv="{}" xmlns:xsi="{}" xmlns:man="{}">"#,
        SOAP_ENV_NAMESPACE, XSI_NAMESPACE, MANTIS_NAMESPACE
    ));
    out.push_str("<soapenv:Body>");
    out.push_str(&format!("<man:{}>", operation));
    for (name, value) in params {
        value.write_element(name, &mut out);
    }
    out.push_str(&format!("</man:{}>", operation));
    out.push_str("</soapenv:Body></soapenv:Envelope>");
    out
}

/// Extracts the `return` element from a SOAP response envelope.
///
/// Operations declared without an output still answer with an empty
/// `*Response` element; those yield an empty `return` node.
///
/// # Errors
///
/// - `MantisError::RemoteFault` if the body carries a `Fault`
/// - `MantisError::Decode` if the envelope structure is not recognised
pub fn read_response(body: &str) -> Result<XmlNode> {
    let envelope = parse_document(body)?;
    if envelope.name != "Envelope" {
        return Err(MantisError::decode(format!(
            "expected SOAP Envelope, found <{}>",
            envelope.name
        )));
    }

    let soap_body = envelope
        .child("Body")
        .ok_or_else(|| MantisError::decode("SOAP envelope has no Body"))?;

    let payload = soap_body
        .children
        .first()
        .ok_or_else(|| MantisError::decode("SOAP Body is empty"))?;

    if payload.name == "Fault" {
        return Err(fault_to_error(payload));
    }

    let result = payload
        .child("return")
        .or_else(|| payload.children.first())
        .cloned()
        .unwrap_or_else(|| XmlNode::new("return"));

    Ok(result)
}

/// Returns true if the body looks like a SOAP fault envelope.
pub fn is_fault(body: &str) -> bool {
    matches!(read_response(body), Err(MantisError::RemoteFault { .. }))
}

fn fault_to_error(fault: &XmlNode) -> MantisError {
    let code = fault.string("faultcode").trim().to_string();
    let message = fault.string("faultstring");
    MantisError::RemoteFault { code, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_envelope_contains_operation_and_params() {
        let params: Params = vec![
            ("username", "admin".into()),
            ("password", "secret".into()),
            ("issue_id", 42i64.into()),
        ];
        let xml = build_envelope("mc_issue_get", &params);

        assert!(xml.contains("<man:mc_issue_get>"));
        assert!(xml.contains("<username>admin</username>"));
        assert!(xml.contains("<issue_id>42</issue_id>"));
        assert!(xml.contains(MANTIS_NAMESPACE));
    }

    #[test]
    fn test_envelope_escapes_text() {
        let params: Params = vec![("summary", "a < b & c".into())];
        let xml = build_envelope("mc_issue_get_id_from_summary", &params);
        assert!(xml.contains("<summary>a &lt; b &amp; c</summary>"));
    }

    #[test]
    fn test_struct_array_and_nil_rendering() {
        let value = SoapValue::Struct(vec![
            ("id", 0i64.into()),
            ("handler", SoapValue::Nil),
            (
                "notes",
                SoapValue::Array(vec![SoapValue::Struct(vec![("text", "hi".into())])]),
            ),
        ]);
        let mut out = String::new();
        value.write_element("issue", &mut out);
        assert_eq!(
            out,
            r#"<issue><id>0</id><handler xsi:nil="true"/><notes><item><text>hi</text></item></notes></issue>"#
        );
    }

    #[test]
    fn test_envelope_round_trips_through_parser() {
        let params: Params = vec![("config_var", "status_enum_string".into())];
        let xml = build_envelope("mc_config_get_string", &params);
        let doc = parse_document(&xml).unwrap();
        let call = &doc.child("Body").unwrap().children[0];
        assert_eq!(call.name, "mc_config_get_string");
        assert_eq!(call.string("config_var"), "status_enum_string");
    }

    #[test]
    fn test_datetime_encoding() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            SoapValue::datetime(Some(&dt)),
            SoapValue::Text("2024-05-06T07:08:09+00:00".to_string())
        );
        assert_eq!(SoapValue::datetime(None), SoapValue::Nil);
    }

    #[test]
    fn test_read_response_return_value() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="http://futureware.biz/mantisconnect">
  <SOAP-ENV:Body>
    <ns1:mc_issue_existsResponse>
      <return>true</return>
    </ns1:mc_issue_existsResponse>
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;
        let ret = read_response(body).unwrap();
        assert_eq!(ret.name, "return");
        assert!(ret.as_bool().unwrap());
    }

    #[test]
    fn test_read_response_void_operation() {
        let body = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Body><ns1:mc_project_deleteResponse xmlns:ns1="urn:x"/></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;
        let ret = read_response(body).unwrap();
        assert_eq!(ret, XmlNode::new("return"));
    }

    #[test]
    fn test_read_response_fault() {
        let body = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/"><SOAP-ENV:Body><SOAP-ENV:Fault><faultcode>SOAP-ENV:Client</faultcode><faultstring>Issue '999' does not exist.</faultstring></SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;
        match read_response(body).unwrap_err() {
            MantisError::RemoteFault { code, message } => {
                assert_eq!(code, "SOAP-ENV:Client");
                assert_eq!(message, "Issue '999' does not exist.");
            }
            other => panic!("expected RemoteFault, got {:?}", other),
        }
        assert!(is_fault(body));
    }

    #[test]
    fn test_read_response_rejects_non_envelope() {
        let err = read_response("<html><body>Not Found</body></html>").unwrap_err();
        assert!(matches!(err, MantisError::Decode(_)));
    }
}
