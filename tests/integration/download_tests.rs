//! Integration tests for the download pool and fetch retries
//!
//! These tests use wiremock for the image hosts and tempfile for the
//! output directory.

use image_sweep::download::download_all;
use image_sweep::fetcher::FetchError;
use image_sweep::{Fetcher, Progress, SweepError};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

fn test_fetcher() -> Fetcher {
    Fetcher::new()
        .expect("Failed to build fetcher")
        .with_backoff_base(Duration::from_millis(5))
}

fn image_response(bytes: &[u8], content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes.to_vec())
        .insert_header("content-type", content_type)
}

#[tokio::test]
async fn test_download_saves_images() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/cat.png"))
        .respond_with(image_response(PNG_BYTES, "image/png"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/avatar"))
        .respond_with(image_response(b"jpegdata", "image/jpeg"))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/img/cat.png", mock_server.uri()),
        format!("{}/avatar", mock_server.uri()),
    ];

    let report = download_all(&test_fetcher(), &urls, out.path(), 4, None)
        .await
        .unwrap();

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.successes.len(), 2);

    let cat = out.path().join("cat.png");
    assert_eq!(std::fs::read(&cat).unwrap(), PNG_BYTES);
    assert_eq!(std::fs::read(out.path().join("avatar.jpg")).unwrap(), b"jpegdata");
}

#[tokio::test]
async fn test_non_image_response_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(image_response(b"<html></html>", "text/html"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty.png"))
        .respond_with(image_response(b"", "image/png"))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/page", mock_server.uri()),
        format!("{}/empty.png", mock_server.uri()),
    ];

    let report = download_all(&test_fetcher(), &urls, out.path(), 2, None)
        .await
        .unwrap();

    assert!(report.successes.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_same_name_from_two_hosts_does_not_overwrite() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for (server, body) in [(&first, b"first".as_slice()), (&second, b"second".as_slice())] {
        Mock::given(method("GET"))
            .and(path("/photo.jpg"))
            .respond_with(image_response(body, "image/jpeg"))
            .mount(server)
            .await;
    }

    let out = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/photo.jpg", first.uri()),
        format!("{}/photo.jpg", second.uri()),
    ];

    let report = download_all(&test_fetcher(), &urls, out.path(), 2, None)
        .await
        .unwrap();

    assert_eq!(report.successes.len(), 2);

    let mut names: Vec<String> = report
        .successes
        .iter()
        .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["photo.jpg", "photo_1.jpg"]);

    let mut contents: Vec<Vec<u8>> = names
        .iter()
        .map(|n| std::fs::read(out.path().join(n)).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
}

#[tokio::test]
async fn test_empty_batch_reports_single_progress_event() {
    let out = TempDir::new().unwrap();
    let (tx, mut rx) = mpsc::channel(8);

    let report = download_all(&test_fetcher(), &[], out.path(), 4, Some(tx))
        .await
        .unwrap();

    assert!(report.successes.is_empty());
    assert!(report.failures.is_empty());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events, vec![Progress { total: 0, completed: 0 }]);
}

#[tokio::test]
async fn test_progress_counts_every_completion() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(image_response(PNG_BYTES, "image/png"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/ok.png", mock_server.uri()),
        format!("{}/gone.png", mock_server.uri()),
    ];
    let (tx, mut rx) = mpsc::channel(8);

    let report = download_all(&test_fetcher(), &urls, out.path(), 1, Some(tx))
        .await
        .unwrap();

    assert_eq!(report.successes.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with(&urls[1]));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let completed: Vec<usize> = events.iter().map(|e| e.completed).collect();
    assert_eq!(completed, vec![0, 1, 2]);
    assert!(events.iter().all(|e| e.total == 2));
}

#[tokio::test]
async fn test_transient_status_is_retried() {
    let mock_server = MockServer::start().await;

    // The first two requests fail, the third succeeds
    Mock::given(method("GET"))
        .and(path("/flaky.png"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.png"))
        .respond_with(image_response(PNG_BYTES, "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let urls = vec![format!("{}/flaky.png", mock_server.uri())];

    let report = download_all(&test_fetcher(), &urls, out.path(), 1, None)
        .await
        .unwrap();

    assert_eq!(report.successes.len(), 1, "{:?}", report.failures);
    assert_eq!(std::fs::read(out.path().join("flaky.png")).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn test_retries_are_exhausted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down.png"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/down.png", mock_server.uri());
    let result = test_fetcher().fetch_bytes(&url).await;

    match result {
        Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected exhausted retries, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing.png", mock_server.uri());
    let result = test_fetcher().fetch_bytes(&url).await;

    assert!(matches!(
        result,
        Err(FetchError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_fetch_text_retries_server_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/page", mock_server.uri());
    let body = test_fetcher().fetch_text(&url).await.unwrap();

    assert_eq!(body, "<p>hello</p>");
}

#[tokio::test]
async fn test_zero_workers_rejected() {
    let out = TempDir::new().unwrap();
    let urls = vec!["https://example.test/a.png".to_string()];

    let result = download_all(&test_fetcher(), &urls, out.path(), 0, None).await;

    assert!(matches!(result, Err(SweepError::InvalidArgument(_))));
}
