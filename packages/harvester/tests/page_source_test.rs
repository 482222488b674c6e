//! HTTP page source tests against a mock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use belex_harvester::{HarvesterError, HttpPageSource, PageSource};

#[tokio::test]
async fn test_fetches_page_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/de/texts_of_law/101.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body/></html>"))
        .mount(&server)
        .await;

    let url = format!("{}/app/de/texts_of_law/101.1", server.uri());
    let body = tokio::task::spawn_blocking(move || -> belex_harvester::Result<String> {
        let source = HttpPageSource::new(5)?;
        source.fetch(&url)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(body, "<html><body/></html>");
}

#[tokio::test]
async fn test_error_status_is_page_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let result = tokio::task::spawn_blocking(move || -> belex_harvester::Result<String> {
        let source = HttpPageSource::new(5)?;
        source.fetch(&url)
    })
    .await
    .unwrap();

    match result {
        Err(HarvesterError::PageDownload { url, .. }) => assert!(url.ends_with("/missing")),
        other => panic!("expected PageDownload error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let url = server.uri();
    let result = tokio::task::spawn_blocking(move || -> belex_harvester::Result<String> {
        let source = HttpPageSource::new(5)?;
        source.fetch(&url)
    })
    .await
    .unwrap();

    assert!(result.is_err());
    server.verify().await;
}
