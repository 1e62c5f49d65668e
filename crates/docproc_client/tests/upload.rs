use docproc_client::{ApiSettings, DocumentApi, FailureKind, HttpDocumentApi, UploadFile};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn upload_file(name: &str, title: Option<&str>) -> UploadFile {
    UploadFile {
        filename: name.to_string(),
        bytes: b"%PDF-1.4 test".to_vec(),
        title: title.map(ToOwned::to_owned),
        section: None,
    }
}

#[tokio::test]
async fn upload_sends_one_multipart_request_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_id": "J1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let files = vec![
        upload_file("contract.pdf", Some("Contract")),
        upload_file("lease.docx", None),
    ];

    let accepted = api.upload(&files).await.expect("upload ok");
    assert_eq!(accepted.job_id, "J1");

    // All files and the metadata fields ride in the single request body.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("name=\"files\""));
    assert!(body.contains("contract.pdf"));
    assert!(body.contains("lease.docx"));
    assert!(body.contains("name=\"titles\""));
    assert!(body.contains("Contract"));
}

#[tokio::test]
async fn upload_surfaces_server_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let err = api.upload(&[upload_file("a.pdf", None)]).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_with_unparseable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let err = api.upload(&[upload_file("a.pdf", None)]).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[test]
fn invalid_base_url_fails_at_construction() {
    let err = HttpDocumentApi::new("not a url", &ApiSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBaseUrl);
}
