//! Integration tests for PageFetcher using wiremock
//!
//! These tests validate the fetch boundary's behavior with mock servers.

use std::time::Duration;

use suchna::error::FetchError;
use suchna::ingest::PageFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> PageFetcher {
    PageFetcher::new(Duration::from_secs(5), "suchna-test/0.1").unwrap()
}

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Notices</title></head>
<body><table><tr><td><a href="/nt180724.pdf">Exam notice</a></td></tr></table></body>
</html>"#;

    Mock::given(method("GET"))
        .and(path("/notices.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notices.php", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    assert!(result.is_ok(), "Fetch should succeed: {:?}", result.err());
    let body = result.unwrap();
    assert!(body.contains("Exam notice"));
}

/// Test that a server error maps to a status error and is not retried
#[tokio::test]
async fn test_server_error_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notices.php"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/notices.php", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    assert!(matches!(result, Err(FetchError::Status(500))));
}

/// Test 404 surfaces as a status error
#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    let url = format!("{}/missing.php", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    assert!(matches!(result, Err(FetchError::Status(404))));
}

/// Test a refused connection surfaces as a transport error
#[tokio::test]
async fn test_connection_error() {
    let result = fetcher().fetch("http://127.0.0.1:1/notices.php").await;
    assert!(matches!(result, Err(FetchError::Http(_))));
}
