use url::Url;

/// Normalizes a URL for visited-set membership
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not http(s)
/// 2. Lowercase scheme and host, drop default ports (done by the parser)
/// 3. Empty path becomes `/`
/// 4. Remove the fragment
///
/// Nothing else is rewritten; `www.` prefixes, trailing slashes and query
/// strings are significant.
///
/// # Examples
///
/// ```
/// use folio::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.com#top").unwrap();
/// assert_eq!(url, "http://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> Option<String> {
    let mut url = Url::parse(url_str.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.into())
}
