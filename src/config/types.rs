use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Keywords that exclude a URL from traversal when found anywhere in it
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "logout", "admin", "login", "signin", "signout", "password", "register", "signup", "auth",
];

/// File extensions a URL path may carry and still be followed
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".html", ".htm", ".aspx", ".php"];

/// Main configuration structure for Folio
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Seed URLs, crawled in order
    pub base_urls: Vec<String>,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,

    /// Interval between scheduled runs (hours)
    pub schedule_hours: u64,

    /// Lowercase substrings that exclude a URL
    pub excluded_keywords: Vec<String>,

    /// Lowercase extensions (with leading dot) a followed URL may carry
    pub allowed_extensions: BTreeSet<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Serialize)]
pub struct CrawlerConfig {
    /// Maximum number of hops from a seed URL
    pub max_depth: u32,

    /// Global budget of converted pages plus downloaded PDFs per run
    pub max_pages: u64,

    /// Pause before descending into each discovered link (seconds)
    pub delay_between_requests: f64,

    /// Per-request timeout for fetches and renders (seconds)
    pub timeout: u64,

    /// Idle keep-alive connections kept per host
    pub max_concurrent: usize,
}

impl CrawlerConfig {
    /// Pause before each linked request; zero for values validation rejects
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_between_requests).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 100,
            delay_between_requests: 1.0,
            timeout: 30,
            max_concurrent: 5,
        }
    }
}

/// Output layout configuration
#[derive(Debug, Clone, Serialize)]
pub struct OutputConfig {
    /// Root directory for everything a run produces
    pub output_dir: PathBuf,
}

impl OutputConfig {
    pub fn logs_dir(&self) -> PathBuf {
        self.output_dir.join("logs")
    }

    pub fn pdfs_dir(&self) -> PathBuf {
        self.output_dir.join("pdfs")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("reports")
    }

    /// SQLite database holding the history of past runs
    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join("history.db")
    }

    /// All directories that must exist before a run starts
    pub fn directories(&self) -> Vec<PathBuf> {
        vec![
            self.output_dir.clone(),
            self.logs_dir(),
            self.pdfs_dir(),
            self.reports_dir(),
        ]
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("crawler_output"),
        }
    }
}

/// Optional TOML configuration file
///
/// Every key is optional; environment variables take precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub base_urls: Option<Vec<String>>,
    #[serde(default)]
    pub crawler: FileCrawlerConfig,
    #[serde(default)]
    pub output: FileOutputConfig,
    #[serde(default)]
    pub schedule: FileScheduleConfig,
}

/// `[crawler]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileCrawlerConfig {
    pub max_depth: Option<u32>,
    pub max_pages: Option<u64>,
    pub delay_between_requests: Option<f64>,
    pub timeout: Option<u64>,
    pub max_concurrent: Option<usize>,
}

/// `[output]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub output_dir: Option<PathBuf>,
}

/// `[schedule]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScheduleConfig {
    pub hours: Option<u64>,
}
