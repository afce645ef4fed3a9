//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of the crawler:
//! - Building the shared HTTP client
//! - Direct downloads of PDF resources
//! - Error classification

use crate::config::CrawlerConfig;
use crate::crawler::traits::{DirectFetchService, FetchResponse};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("Folio/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with proper configuration
///
/// `max_concurrent` bounds idle keep-alive connections per host; it does not
/// make the traversal concurrent.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10).min(config.request_timeout()))
        .pool_max_idle_per_host(config.max_concurrent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Reads the Content-Type header of a response, if present and valid
pub(crate) fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Direct downloader backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectFetchService for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?
            .to_vec();

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}
