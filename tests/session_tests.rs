//! End-to-end tests: a full `Session` over HTTP against a mock MantisConnect endpoint.

use mantisconnect::{ErrorKind, Issue, IssueNote, MantisError, ObjectRef, Session, SessionConfig};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT_PATH: &str = "/mantis/api/soap/mantisconnect.php";

fn soap_response(operation: &str, inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <SOAP-ENV:Envelope xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         xmlns:ns1=\"http://futureware.biz/mantisconnect\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <SOAP-ENV:Body><ns1:{op}Response>{inner}</ns1:{op}Response></SOAP-ENV:Body>\
         </SOAP-ENV:Envelope>",
        op = operation,
        inner = inner
    )
}

fn soap_fault(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <SOAP-ENV:Envelope xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <SOAP-ENV:Body><SOAP-ENV:Fault><faultcode>SOAP-ENV:Client</faultcode>\
         <faultstring>{}</faultstring></SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>",
        message
    )
}

async fn mount(server: &MockServer, operation: &str, inner: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_string_contains(format!("<man:{}>", operation)))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_response(operation, inner)))
        .mount(server)
        .await;
}

fn session_for(server: &MockServer) -> Session {
    let config = SessionConfig::new(format!("{}/mantis/", server.uri()), "reporter", "p@ss");
    Session::new(config).unwrap()
}

#[tokio::test]
async fn test_connect_and_cache_status_enum() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(header(
            "SOAPAction",
            "http://futureware.biz/mantisconnect#mc_config_get_string",
        ))
        .and(body_string_contains("<config_var>status_enum_string</config_var>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_response(
            "mc_config_get_string",
            "<return>10:new,20:feedback,80:resolved,90:closed</return>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    assert_eq!(
        session.url(),
        format!("{}{}", server.uri(), ENDPOINT_PATH)
    );

    tokio_test::assert_ok!(session.connect().await);

    let status = session.config().status_enum().await.unwrap();
    assert_eq!(status.label(80), "resolved");
    assert_eq!(status.code("closed"), 90);
    assert_eq!(session.config().cached_len().await, 1);
}

#[tokio::test]
async fn test_issue_lifecycle() {
    let server = MockServer::start().await;
    mount(&server, "mc_issue_add", "<return>101</return>").await;
    mount(
        &server,
        "mc_issue_get",
        "<return>\
           <id>101</id>\
           <view_state><id>10</id><name>public</name></view_state>\
           <project><id>1</id><name>Mantis</name></project>\
           <category>General</category>\
           <priority><id>30</id><name>normal</name></priority>\
           <severity><id>50</id><name>minor</name></severity>\
           <status><id>10</id><name>new</name></status>\
           <reporter><id>2</id><name>reporter</name></reporter>\
           <summary>Crash on save</summary>\
           <description>Line one\nLine two</description>\
           <handler xsi:nil=\"true\"/>\
           <date_submitted>2024-03-01T10:20:30+00:00</date_submitted>\
           <notes><item><id>5</id><reporter><id>2</id><name>reporter</name></reporter>\
             <text>First note</text></item></notes>\
           <attachments><item><id>3</id><filename>log.txt</filename><size>12</size>\
             <content_type>text/plain</content_type></item></attachments>\
         </return>",
    )
    .await;
    mount(&server, "mc_issue_note_add", "<return>6</return>").await;

    let session = session_for(&server);
    let request = session.request();

    let issue = Issue::new("Crash on save", "Line one\nLine two")
        .with_project(ObjectRef::new(1, "Mantis"))
        .with_category(ObjectRef::from_name("General"));
    assert_eq!(request.add_issue(&issue).await.unwrap(), 101);

    let fetched = request.get_issue(101).await.unwrap().unwrap();
    assert_eq!(fetched.id, 101);
    assert_eq!(fetched.summary, "Crash on save");
    assert_eq!(fetched.description, issue.description);
    assert_eq!(fetched.project, ObjectRef::new(1, "Mantis"));
    assert_eq!(fetched.category.name(), "General");
    assert_eq!(fetched.reported_by.name, "reporter");
    assert!(fetched.assigned_to.is_none());
    assert_eq!(fetched.notes.len(), 1);
    assert_eq!(fetched.notes[0].text, "First note");
    assert_eq!(fetched.attachments[0].file_name, "log.txt");
    assert!(fetched.date_submitted.is_some());

    let note_id = request
        .add_note(101, &IssueNote::new("Reproduced on 1.3"))
        .await
        .unwrap();
    assert_eq!(note_id, 6);
}

#[tokio::test]
async fn test_fault_is_reported_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(soap_fault(
            "Issue &apos;999&apos; does not exist.",
        )))
        .mount(&server)
        .await;

    let session = session_for(&server);
    match session.request().get_issue(999).await.unwrap_err() {
        MantisError::RemoteFault { code, message } => {
            assert_eq!(code, "SOAP-ENV:Client");
            assert_eq!(message, "Issue '999' does not exist.");
        }
        other => panic!("expected RemoteFault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_project_tree() {
    let server = MockServer::start().await;
    mount(
        &server,
        "mc_projects_get_user_accessible",
        "<return>\
           <item><id>1</id><name>Mantis</name><enabled>true</enabled>\
             <subprojects><item><id>4</id><name>Docs</name><enabled>true</enabled>\
               <subprojects/></item></subprojects></item>\
         </return>",
    )
    .await;

    let session = session_for(&server);
    let projects = session.request().get_user_accessible_projects().await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].subprojects[0].name, "Docs");
    assert_eq!(projects[0].find(4).map(|p| p.id), Some(4));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on the discard port.
    let config = SessionConfig::new("http://127.0.0.1:9/mantis/", "reporter", "p@ss");
    let session = Session::new(config).unwrap();

    let err = session.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.to_string().contains("p@ss"));
}

#[test]
fn test_invalid_arguments_fail_without_server() {
    let config = SessionConfig::new("http://127.0.0.1:9/mantis/", "reporter", "p@ss");
    let session = Session::new(config).unwrap();

    let err = tokio_test::block_on(session.request().get_issue(0)).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = tokio_test::block_on(session.config().get_string("has space")).unwrap_err();
    assert!(err.is_invalid_argument());
}
