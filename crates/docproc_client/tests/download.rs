use docproc_client::{ApiSettings, ArtifactKind, DocumentApi, FailureKind, HttpDocumentApi};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn download_takes_filename_from_content_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/F1/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    "attachment; filename=\"lease_plain.docx\"",
                )
                .set_body_bytes(b"PK docx bytes".to_vec()),
        )
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let artifact = api.download("F1", ArtifactKind::Plain).await.expect("ok");

    assert_eq!(artifact.filename, "lease_plain.docx");
    assert_eq!(artifact.bytes, b"PK docx bytes");
}

#[tokio::test]
async fn download_without_disposition_uses_generated_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/F2/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK".to_vec()))
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let artifact = api.download("F2", ArtifactKind::Summary).await.expect("ok");

    assert_eq!(artifact.filename, "processed_document_summary.docx");
}

#[tokio::test]
async fn download_of_unknown_file_surfaces_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/F9/plain"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = HttpDocumentApi::new(&server.uri(), &ApiSettings::default()).expect("client");
    let err = api.download("F9", ArtifactKind::Plain).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}
