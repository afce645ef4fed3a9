//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and run the full crawl
//! cycle end-to-end with the real HTTP fetcher and link extractor. Rendering
//! is replaced by a stub that turns each URL into unique bytes.

use async_trait::async_trait;
use folio::config::{from_sources, Config, FileConfig};
use folio::crawler::{
    build_http_client, run_crawl_with, Collaborators, HtmlLinkExtractor, HttpFetcher,
    RenderService,
};
use folio::storage::{open_history, FsArtifactStore, RunHistory, RunStatus};
use folio::RenderError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renderer stub that records every call in order
#[derive(Default)]
struct StubRenderer {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl StubRenderer {
    fn failing(urls: &[String]) -> Self {
        Self {
            failing: urls.to_vec(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderService for StubRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, RenderError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.iter().any(|f| f == url) {
            return Err(RenderError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            });
        }
        Ok(format!("%PDF-1.4 rendered {}", url).into_bytes())
    }
}

/// Creates a test configuration writing into `output`
fn create_test_config(seeds: &[String], max_depth: u32, max_pages: u64, output: &TempDir) -> Config {
    let vars: HashMap<&str, String> = [
        ("BASE_URLS", seeds.join(",")),
        ("MAX_DEPTH", max_depth.to_string()),
        ("MAX_PAGES", max_pages.to_string()),
        ("DELAY_BETWEEN_REQUESTS", "0".to_string()),
        ("TIMEOUT", "5".to_string()),
        ("OUTPUT_DIR", output.path().display().to_string()),
    ]
    .into_iter()
    .collect();
    from_sources(FileConfig::default(), |key| vars.get(key).cloned()).unwrap()
}

fn collaborators(config: &Config, renderer: Arc<StubRenderer>) -> Collaborators {
    let client = build_http_client(&config.crawler).unwrap();
    Collaborators {
        renderer,
        fetcher: Arc::new(HttpFetcher::new(client.clone())),
        extractor: Arc::new(HtmlLinkExtractor::new(client)),
        store: Arc::new(FsArtifactStore::new(config.output.pdfs_dir())),
    }
}

/// Mounts an HTML page whose body links to each of `links` (absolute paths)
async fn mount_page(server: &MockServer, page: &str, links: &[&str]) {
    let body: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
        .collect();
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(format!("<html><body>{}</body></html>", body), "text/html"),
        )
        .mount(server)
        .await;
}

fn saved_files(config: &Config) -> usize {
    std::fs::read_dir(config.output.pdfs_dir()).unwrap().count()
}

#[tokio::test]
async fn test_budget_caps_pages_converted() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b", "/c"]).await;
    mount_page(&server, "/a", &[]).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 3, 2, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    assert_eq!(run.snapshot.pages_converted, 2);
    assert_eq!(run.snapshot.errors_count, 0);
    assert_eq!(
        renderer.calls(),
        vec![format!("{}/", server.uri()), format!("{}/a", server.uri())]
    );
    assert_eq!(saved_files(&config), 2);

    // Reports and history are written for the run
    assert_eq!(run.reports.len(), 2);
    assert!(run.reports.iter().all(|p| p.exists()));
    let history = open_history(&config.output.history_path()).unwrap();
    let record = history.get_run(run.run_id).unwrap();
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.pages_converted, 2);
}

#[tokio::test]
async fn test_shared_pdf_deduplicated_across_seeds() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/files/report.pdf"]).await;
    mount_page(&server, "/other/", &["/files/report.pdf"]).await;
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7 shared".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let seeds = [
        format!("{}/", server.uri()),
        format!("{}/other/", server.uri()),
    ];
    let config = create_test_config(&seeds, 3, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    let snapshot = &run.snapshot;
    assert_eq!(snapshot.pdfs_found, 1);
    assert_eq!(snapshot.pdfs_downloaded, 1);
    assert_eq!(snapshot.duplicates_skipped, 1);
    assert_eq!(snapshot.pages_converted, 2);
    assert_eq!(saved_files(&config), 3);
    // PDFs are downloaded, never rendered
    assert!(renderer.calls().iter().all(|u| !u.ends_with(".pdf")));
}

#[tokio::test]
async fn test_login_link_filtered_without_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/login", "/account/signin.html", "/about"]).await;
    mount_page(&server, "/about", &[]).await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 3, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    assert_eq!(run.snapshot.errors_count, 0);
    assert_eq!(
        renderer.calls(),
        vec![format!("{}/", server.uri()), format!("{}/about", server.uri())]
    );
}

#[tokio::test]
async fn test_render_failure_recorded_and_siblings_continue() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/slow", "/after"]).await;
    mount_page(&server, "/after", &[]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 3, 100, &output);
    let slow = format!("{}/slow", server.uri());
    let renderer = Arc::new(StubRenderer::failing(&[slow.clone()]));

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    let snapshot = &run.snapshot;
    assert_eq!(snapshot.errors_count, 1);
    assert_eq!(snapshot.errors[0].url, slow);
    assert!(snapshot.errors[0].error.contains("timed out"));
    assert_eq!(snapshot.pages_converted, 2);
    assert_eq!(renderer.calls().last(), Some(&format!("{}/after", server.uri())));

    let history = open_history(&config.output.history_path()).unwrap();
    let errors = history.run_errors(run.run_id).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].url, slow);
}

#[tokio::test]
async fn test_missing_pdf_records_http_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/missing.pdf"]).await;
    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 3, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer))
        .await
        .unwrap();

    let snapshot = &run.snapshot;
    assert_eq!(snapshot.errors_count, 1);
    assert_eq!(snapshot.errors[0].error, "Failed to download PDF: HTTP 404");
    assert_eq!(snapshot.pdfs_found, 0);
    assert_eq!(snapshot.pdfs_downloaded, 0);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    // A page at the depth limit is rendered but never fetched for links
    Mock::given(method("GET"))
        .and(path("/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"<a href="/2">2</a>"#, "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 1, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    assert_eq!(run.snapshot.pages_converted, 2);
    assert_eq!(
        renderer.calls(),
        vec![format!("{}/", server.uri()), format!("{}/1", server.uri())]
    );
}

#[tokio::test]
async fn test_no_url_visited_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r##"<a href="/a">a</a><a href="/">home</a><a href="/#top">top</a>"##,
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/">home</a><a href="/a">self</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 5, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    assert_eq!(run.snapshot.pages_converted, 2);
    assert_eq!(
        renderer.calls(),
        vec![format!("{}/", server.uri()), format!("{}/a", server.uri())]
    );
}

#[tokio::test]
async fn test_offsite_links_not_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(r#"<a href="{}/elsewhere">away</a>"#, other.uri()),
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 3, 100, &output);
    let renderer = Arc::new(StubRenderer::default());

    let run = run_crawl_with(&config, collaborators(&config, renderer.clone()))
        .await
        .unwrap();

    assert_eq!(run.snapshot.pages_converted, 1);
    assert_eq!(renderer.calls().len(), 1);
}

#[tokio::test]
async fn test_unfinished_runs_marked_interrupted() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &[]).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&[format!("{}/", server.uri())], 1, 100, &output);

    std::fs::create_dir_all(&config.output.output_dir).unwrap();
    let stale = {
        let mut history = open_history(&config.output.history_path()).unwrap();
        history.start_run("stale").unwrap()
    };

    let renderer = Arc::new(StubRenderer::default());
    let run = run_crawl_with(&config, collaborators(&config, renderer))
        .await
        .unwrap();

    let history = open_history(&config.output.history_path()).unwrap();
    assert_eq!(history.get_run(stale).unwrap().status, RunStatus::Interrupted);
    assert_eq!(
        history.get_run(run.run_id).unwrap().status,
        RunStatus::Completed
    );
}
