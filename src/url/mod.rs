//! URL handling module for Folio
//!
//! This module provides origin extraction, visited-set normalization, the
//! link eligibility filter, and content classification for acquisition.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{extract_origin, origin_of};
pub use filter::is_eligible;
pub use normalize::normalize_url;

/// How a URL's content is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Downloaded as-is; the bytes are already a PDF
    DirectPdf,
    /// Rendered to PDF by the headless browser
    Page,
}

/// Classifies a URL for acquisition
///
/// A URL is treated as a direct PDF when its lowercased form ends in `.pdf`
/// or contains `pdf` anywhere. The substring rule also matches paths such as
/// `/pdfviewer/index.html`; those are downloaded rather than rendered.
///
/// # Examples
///
/// ```
/// use folio::url::{classify_url, ContentKind};
///
/// assert_eq!(classify_url("https://example.com/Report.PDF"), ContentKind::DirectPdf);
/// assert_eq!(classify_url("https://example.com/get?format=pdf"), ContentKind::DirectPdf);
/// assert_eq!(classify_url("https://example.com/about.html"), ContentKind::Page);
/// ```
pub fn classify_url(url: &str) -> ContentKind {
    if is_pdf_url(url) {
        ContentKind::DirectPdf
    } else {
        ContentKind::Page
    }
}

/// Returns true if the URL should be downloaded directly as a PDF
pub fn is_pdf_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    lowered.ends_with(".pdf") || lowered.contains("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_suffix() {
        assert!(is_pdf_url("https://example.com/files/annual.pdf"));
        assert!(is_pdf_url("https://example.com/files/ANNUAL.PDF"));
    }

    #[test]
    fn test_pdf_substring_anywhere() {
        assert!(is_pdf_url("https://example.com/download?type=pdf"));
        assert!(is_pdf_url("https://example.com/pdfviewer/index.html"));
        assert!(is_pdf_url("https://pdfs.example.com/"));
    }

    #[test]
    fn test_html_pages() {
        assert!(!is_pdf_url("https://example.com/"));
        assert!(!is_pdf_url("https://example.com/docs/index.html"));
        assert!(!is_pdf_url("https://example.com/p-d-f"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify_url("https://example.com/a.pdf"),
            ContentKind::DirectPdf
        );
        assert_eq!(classify_url("https://example.com/a.html"), ContentKind::Page);
    }
}
