//! End-to-end tests: page scan, download, manifest and archive

use image_sweep::config::Config;
use image_sweep::output::{read_manifest, MANIFEST_FILE_NAME};
use image_sweep::pipeline;
use image_sweep::{Fetcher, Progress};
use std::collections::BTreeSet;
use std::io::Read;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 7, 7, 7];

fn test_fetcher() -> Fetcher {
    Fetcher::new()
        .expect("Failed to build fetcher")
        .with_backoff_base(Duration::from_millis(5))
}

async fn mount(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn png() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(PNG_BYTES.to_vec())
        .insert_header("content-type", "image/png")
}

#[tokio::test]
async fn test_single_page_end_to_end() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html(r#"<img src="cat.png">"#)).await;
    mount(&mock_server, "/cat.png", png()).await;

    let workspace = TempDir::new().unwrap();
    let out_dir = workspace.path().join("out");
    let (tx, mut rx) = mpsc::channel(16);

    let summary = pipeline::run(
        &test_fetcher(),
        &mock_server.uri(),
        &Config::default(),
        &out_dir,
        Some(tx),
    )
    .await
    .unwrap();

    assert_eq!(summary.pages, vec![format!("{}/", mock_server.uri())]);
    assert_eq!(summary.images_found, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.failed, 0);
    assert!(summary.packaging_errors.is_empty());
    assert_eq!(std::fs::read(out_dir.join("cat.png")).unwrap(), PNG_BYTES);

    let manifest_path = summary.manifest_path.unwrap();
    assert_eq!(manifest_path, out_dir.join(MANIFEST_FILE_NAME));
    let manifest = read_manifest(&manifest_path).unwrap();
    assert_eq!(manifest.source_pages, summary.pages);
    assert_eq!(manifest.downloaded.len(), 1);
    assert_eq!(manifest.downloaded[0].url, format!("{}/cat.png", mock_server.uri()));
    assert!(manifest.failed.is_empty());
    assert!(manifest.created_at.is_some());

    let archive_path = summary.archive_path.unwrap();
    assert_eq!(
        archive_path,
        workspace.path().canonicalize().unwrap().join("out.zip")
    );
    let file = std::fs::File::open(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let names: BTreeSet<String> = archive.file_names().map(String::from).collect();
    assert!(names.contains("cat.png"));
    assert!(names.contains(MANIFEST_FILE_NAME));

    let mut stored = Vec::new();
    archive
        .by_name("cat.png")
        .unwrap()
        .read_to_end(&mut stored)
        .unwrap();
    assert_eq!(stored, PNG_BYTES);

    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some(event);
    }
    assert_eq!(last, Some(Progress { total: 1, completed: 1 }));
}

#[tokio::test]
async fn test_stylesheet_and_data_images() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(
            r#"<html><head>
                <link rel="stylesheet" href="/css/site.css">
                <style>.hero { background: url("data:image/png;base64,AAAA") }</style>
            </head><body><div style="background-image: url('/inline.png')"></div></body></html>"#,
        ),
    )
    .await;
    mount(
        &mock_server,
        "/css/site.css",
        ResponseTemplate::new(200)
            .set_body_string(".logo { background: url(../img/logo.png) }")
            .insert_header("content-type", "text/css"),
    )
    .await;
    mount(&mock_server, "/img/logo.png", png()).await;
    mount(&mock_server, "/inline.png", png()).await;

    let workspace = TempDir::new().unwrap();
    let out_dir = workspace.path().join("site");
    let mut config = Config::default();
    config.output.archive = false;

    let summary = pipeline::run(&test_fetcher(), &mock_server.uri(), &config, &out_dir, None)
        .await
        .unwrap();

    assert_eq!(summary.images_found, 3);
    assert_eq!(summary.data_urls, 1);
    assert_eq!(summary.downloaded, 2);
    assert!(summary.archive_path.is_none());
    assert!(!workspace.path().join("site.zip").exists());
    assert!(out_dir.join("logo.png").exists());
    assert!(out_dir.join("inline.png").exists());

    let manifest = read_manifest(&out_dir.join(MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(manifest.data_urls, vec!["data:image/png;base64,AAAA"]);
    assert_eq!(
        manifest.css_files,
        vec![format!("{}/css/site.css", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_crawl_collects_images_from_every_page() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(r#"<a href="/gallery">Gallery</a><img src="/a.png">"#),
    )
    .await;
    mount(
        &mock_server,
        "/gallery",
        html(r#"<img srcset="/b.png 1x, /a.png 2x"><a href="/">Home</a>"#),
    )
    .await;
    mount(&mock_server, "/a.png", png()).await;
    mount(&mock_server, "/b.png", png()).await;

    let workspace = TempDir::new().unwrap();
    let out_dir = workspace.path().join("crawl");
    let mut config = Config::default();
    config.crawler.enabled = true;
    config.crawler.max_pages = 5;
    config.output.archive = false;

    let summary = pipeline::run(&test_fetcher(), &mock_server.uri(), &config, &out_dir, None)
        .await
        .unwrap();

    assert_eq!(summary.pages.len(), 2);
    assert_eq!(summary.images_found, 2);
    assert_eq!(summary.downloaded, 2);
    assert!(out_dir.join("a.png").exists());
    assert!(out_dir.join("b.png").exists());
}

#[tokio::test]
async fn test_unreachable_start_page_still_packages() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", ResponseTemplate::new(404)).await;

    let workspace = TempDir::new().unwrap();
    let out_dir = workspace.path().join("empty");

    let summary = pipeline::run(
        &test_fetcher(),
        &mock_server.uri(),
        &Config::default(),
        &out_dir,
        None,
    )
    .await
    .unwrap();

    assert_eq!(summary.images_found, 0);
    assert_eq!(summary.downloaded, 0);
    let manifest = read_manifest(&out_dir.join(MANIFEST_FILE_NAME)).unwrap();
    assert!(manifest.downloaded.is_empty());
    assert!(workspace.path().join("empty.zip").exists());
}

#[tokio::test]
async fn test_invalid_start_url_rejected() {
    let workspace = TempDir::new().unwrap();
    let result = pipeline::run(
        &test_fetcher(),
        "ftp://example.test/",
        &Config::default(),
        workspace.path(),
        None,
    )
    .await;

    assert!(result.is_err());
}
