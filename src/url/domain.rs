use url::Url;

/// Extracts the origin of a URL used for same-site filtering
///
/// The origin is the lowercase host followed by `:port` when the URL carries a
/// non-default port. No other normalization is applied, so `www.example.com`
/// and `example.com` are different origins.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use folio::url::origin_of;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(origin_of(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(origin_of(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Parses `url_str` and returns its origin, or `None` if it has none
pub fn extract_origin(url_str: &str) -> Option<String> {
    Url::parse(url_str).ok().as_ref().and_then(origin_of)
}
