use crate::url::domain::origin_of;
use std::collections::BTreeSet;
use url::Url;

/// Decides whether a discovered link should be followed
///
/// # Rules
///
/// 1. The link's origin must equal `origin` exactly
/// 2. The lowercased link must not contain any excluded keyword
/// 3. If the last path segment carries an extension, it must be in `allowed_extensions`
///    (extension-less paths such as `/docs/` or `/about` always pass)
///
/// Links that fail to parse are never eligible. The function is pure.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use folio::url::is_eligible;
///
/// let excluded = vec!["login".to_string()];
/// let allowed: BTreeSet<String> = [".html".to_string()].into_iter().collect();
///
/// assert!(is_eligible("https://example.com/a.html", "example.com", &excluded, &allowed));
/// assert!(!is_eligible("https://example.com/login", "example.com", &excluded, &allowed));
/// assert!(!is_eligible("https://example.com/a.zip", "example.com", &excluded, &allowed));
/// assert!(!is_eligible("https://other.com/a.html", "example.com", &excluded, &allowed));
/// ```
pub fn is_eligible(
    link: &str,
    origin: &str,
    excluded_keywords: &[String],
    allowed_extensions: &BTreeSet<String>,
) -> bool {
    let Ok(parsed) = Url::parse(link) else {
        return false;
    };

    if origin_of(&parsed).as_deref() != Some(origin) {
        return false;
    }

    let lowered = link.to_lowercase();
    if excluded_keywords
        .iter()
        .any(|keyword| lowered.contains(keyword.as_str()))
    {
        return false;
    }

    let path = parsed.path().to_lowercase();
    if let Some(extension) = path_extension(&path) {
        if !allowed_extensions.contains(&extension) {
            return false;
        }
    }

    true
}

/// Returns the extension of the last path segment, including the leading dot
///
/// A trailing slash is ignored, a segment that only starts with a dot (`.env`)
/// has no extension, and a trailing dot yields no extension.
fn path_extension(path: &str) -> Option<String> {
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(format!(".{}", extension))
}
