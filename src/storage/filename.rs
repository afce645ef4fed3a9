use chrono::{DateTime, TimeZone};
use sha2::{Digest, Sha256};
use std::fmt::Display;
use url::Url;

/// Paths longer than this are truncated and suffixed with a hash
const MAX_PATH_LENGTH: usize = 100;

/// Derives the artifact filename for a URL
///
/// The name is `<host>_<path>_<timestamp>.pdf` where
/// - `host` has `www.` removed and dots replaced by `_` (a port is appended as `_<port>`)
/// - `path` has its surrounding slashes stripped and inner slashes replaced by `_`,
///   followed by `_q<hash>` when the URL has a query string
/// - a `path` longer than 100 characters is cut to 100 and suffixed with a hash of the
///   uncut value
/// - `timestamp` is `YYYYmmdd_HHMMSS`
///
/// Hashes are the first 8 hex digits of SHA-256.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use folio::storage::generate_filename;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
/// assert_eq!(
///     generate_filename("https://www.example.com/docs/guide.html", &at),
///     "example_com_docs_guide.html_20240301_093000.pdf"
/// );
/// ```
pub fn generate_filename<Tz>(url: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let timestamp = at.format("%Y%m%d_%H%M%S");

    let (domain, mut path) = match Url::parse(url) {
        Ok(parsed) => {
            let mut domain = parsed
                .host_str()
                .unwrap_or("unknown")
                .replace("www.", "")
                .replace('.', "_");
            if let Some(port) = parsed.port() {
                domain.push_str(&format!("_{}", port));
            }

            let mut path = parsed
                .path()
                .trim_matches('/')
                .replace(['/', '\\'], "_");
            if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
                path.push_str(&format!("_q{}", short_hash(query)));
            }
            (domain, path)
        }
        Err(_) => ("unknown".to_string(), short_hash(url)),
    };

    if path.chars().count() > MAX_PATH_LENGTH {
        let suffix = short_hash(&path);
        path = path.chars().take(MAX_PATH_LENGTH).collect();
        path.push_str(&suffix);
    }

    format!("{}_{}_{}.pdf", domain, path, timestamp)
}

fn short_hash(value: &str) -> String {
    let digest = hex::encode(Sha256::digest(value.as_bytes()));
    digest[..8].to_string()
}
