//! Collaborator interfaces the traversal depends on
//!
//! The coordinator never talks to the network or a browser directly; it holds
//! one implementation of each trait behind an `Arc<dyn ..>`.

use crate::{FetchError, RenderError};
use async_trait::async_trait;
use std::time::Duration;

/// Turns a URL into the bytes of a complete PDF document
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Renders `url`, giving up after `timeout`. Failures are reported, never retried.
    async fn render(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, RenderError>;

    /// Releases any resources held by the renderer
    async fn shutdown(&self) {}
}

/// Raw response of a direct download
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Downloads a resource as raw bytes
#[async_trait]
pub trait DirectFetchService: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Lists the absolute URLs a page links to, in document order
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<Vec<String>, FetchError>;
}
