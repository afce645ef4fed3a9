//! Headless Chromium renderer
//!
//! Pages are loaded in a shared browser and printed to A4 PDFs. The browser
//! is launched on the first render and lives until `shutdown`.

use crate::crawler::traits::RenderService;
use crate::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Environment variable that overrides the browser executable
pub const CHROMIUM_PATH_VAR: &str = "CHROMIUM_PATH";

/// Pause after the body appears, for scripts that build the page late
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Upper bound on closing a tab once its render has finished or expired
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// A4 in inches
const PAPER_WIDTH: f64 = 8.27;
const PAPER_HEIGHT: f64 = 11.69;
const MARGIN: f64 = 0.4;

struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Renders pages to PDF with a lazily launched headless Chromium
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
    session: Mutex<Option<BrowserSession>>,
}

impl ChromiumRenderer {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            session: Mutex::new(None),
        }
    }

    /// Uses `CHROMIUM_PATH` when set, otherwise lets chromiumoxide locate the browser
    pub fn from_env() -> Self {
        let executable = std::env::var_os(CHROMIUM_PATH_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(executable)
    }

    async fn launch(&self) -> Result<BrowserSession, RenderError> {
        let mut builder = BrowserConfig::builder()
            .window_size(1920, 1080)
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--hide-scrollbars");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {:?}", e);
                }
            }
        });

        info!("Headless browser launched");
        Ok(BrowserSession { browser, handler })
    }
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::from_env()
    }
}

fn print_params() -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH),
        paper_height: Some(PAPER_HEIGHT),
        margin_top: Some(MARGIN),
        margin_bottom: Some(MARGIN),
        margin_left: Some(MARGIN),
        margin_right: Some(MARGIN),
        ..Default::default()
    }
}

async fn capture(page: &Page, url: &str) -> Result<Vec<u8>, RenderError> {
    page.wait_for_navigation()
        .await
        .map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    page.find_element("body")
        .await
        .map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    tokio::time::sleep(SETTLE_DELAY).await;

    page.pdf(print_params())
        .await
        .map_err(|e| RenderError::Print {
            url: url.to_string(),
            message: e.to_string(),
        })
}

/// Bounds `work` by `deadline`, mapping expiry to `RenderError::Timeout`
async fn within<F, T>(deadline: Instant, limit: Duration, url: &str, work: F) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout_at(deadline, work).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            url: url.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

/// Awaits `work`, then `close`, whatever `work` returned
async fn then_close<W, C>(work: W, close: C) -> Result<Vec<u8>, RenderError>
where
    W: Future<Output = Result<Vec<u8>, RenderError>>,
    C: Future<Output = ()>,
{
    let result = work.await;
    close.await;
    result
}

async fn close_page(page: Page, url: &str) {
    match tokio::time::timeout(CLOSE_TIMEOUT, page.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Failed to close page for {}: {}", url, e),
        Err(_) => warn!("Closing page for {} timed out", url),
    }
}

async fn print_page(browser: &Browser, url: &str, limit: Duration) -> Result<Vec<u8>, RenderError> {
    let deadline = Instant::now() + limit;

    let page = within(deadline, limit, url, async {
        browser
            .new_page(url)
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    })
    .await?;

    let capture_page = page.clone();
    then_close(
        within(deadline, limit, url, capture(&capture_page, url)),
        close_page(page, url),
    )
    .await
}

#[async_trait]
impl RenderService for ChromiumRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, RenderError> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let session = guard
            .as_ref()
            .ok_or_else(|| RenderError::Launch("browser session unavailable".to_string()))?;

        debug!("Rendering {}", url);
        print_page(&session.browser, url, timeout).await
    }

    async fn shutdown(&self) {
        let Some(mut session) = self.session.lock().await.take() else {
            return;
        };

        if let Err(e) = session.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        session.handler.abort();
        info!("Headless browser closed");
    }
}
