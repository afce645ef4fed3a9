//! HTML link extraction
//!
//! This module fetches a page and lists the hyperlinks it contains.
//! Only `<a href>` anchors are followed; stylesheets, scripts and images are not.

use crate::crawler::fetcher::content_type_of;
use crate::crawler::traits::LinkExtractor;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Extracts all followable links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document, in document order
/// - `<a href="..." download>` (the acquirer decides what to do with the target)
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to an http(s) URL
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```
/// use folio::crawler::parse_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(parse_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn parse_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Link extractor that fetches pages with a shared reqwest client
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    client: Client,
}

impl HtmlLinkExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkExtractor for HtmlLinkExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = content_type_of(&response).unwrap_or_default();
        if content_type.to_ascii_lowercase().contains("application/pdf") {
            debug!("Not parsing links from PDF response: {}", url);
            return Ok(Vec::new());
        }

        // Relative links resolve against the post-redirect URL
        let base_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let links = parse_links(&body, &base_url);
        debug!("Extracted {} links from {}", links.len(), url);
        Ok(links)
    }
}
