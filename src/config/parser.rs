use crate::config::types::{Config, CrawlerConfig, FileConfig, OutputConfig};
use crate::config::types::{ALLOWED_EXTENSIONS, EXCLUDED_KEYWORDS};
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_SCHEDULE_HOURS: u64 = 12;

/// Loads the configuration from the environment
///
/// A `.env` file in the working directory is loaded first (variables already
/// present in the process environment win). When `path` is given, the TOML
/// file supplies values for every variable the environment leaves unset.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Missing or malformed values, or validation failure
///
/// # Example
///
/// ```no_run
/// use folio::config::load_config;
///
/// std::env::set_var("BASE_URLS", "https://example.com");
/// let config = load_config(None).unwrap();
/// assert_eq!(config.crawler.max_depth, 3);
/// ```
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    match dotenvy::dotenv() {
        Ok(env_path) => tracing::debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    let file = match path {
        Some(path) => read_config_file(path)?,
        None => FileConfig::default(),
    };

    let config = from_sources(file, |key| std::env::var(key).ok())?;
    validate(&config)?;

    tracing::info!(
        "Configuration loaded: MAX_DEPTH={}, MAX_PAGES={}, DELAY={}s, TIMEOUT={}s, CONCURRENT={}, OUTPUT_DIR={}",
        config.crawler.max_depth,
        config.crawler.max_pages,
        config.crawler.delay_between_requests,
        config.crawler.timeout,
        config.crawler.max_concurrent,
        config.output.output_dir.display()
    );

    Ok(config)
}

/// Reads and parses a TOML configuration file
pub fn read_config_file(path: &Path) -> ConfigResult<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Builds a configuration from a variable lookup layered over a file config
///
/// The lookup is consulted first for each key; empty values count as unset.
/// No validation is performed here.
pub fn from_sources<F>(file: FileConfig, lookup: F) -> ConfigResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let defaults = CrawlerConfig::default();

    let base_urls = match lookup("BASE_URLS") {
        Some(raw) => split_csv(&raw),
        None => file.base_urls.unwrap_or_default(),
    };
    if base_urls.is_empty() {
        tracing::error!("No BASE_URLS provided in the environment variables.");
        return Err(ConfigError::Missing("BASE_URLS"));
    }

    let crawler = CrawlerConfig {
        max_depth: parse_var(&lookup, "MAX_DEPTH")?
            .or(file.crawler.max_depth)
            .unwrap_or(defaults.max_depth),
        max_pages: parse_var(&lookup, "MAX_PAGES")?
            .or(file.crawler.max_pages)
            .unwrap_or(defaults.max_pages),
        delay_between_requests: parse_var(&lookup, "DELAY_BETWEEN_REQUESTS")?
            .or(file.crawler.delay_between_requests)
            .unwrap_or(defaults.delay_between_requests),
        timeout: parse_var(&lookup, "TIMEOUT")?
            .or(file.crawler.timeout)
            .unwrap_or(defaults.timeout),
        max_concurrent: parse_var(&lookup, "MAX_CONCURRENT")?
            .or(file.crawler.max_concurrent)
            .unwrap_or(defaults.max_concurrent),
    };

    let output_dir = lookup("OUTPUT_DIR")
        .map(PathBuf::from)
        .or(file.output.output_dir)
        .unwrap_or_else(|| OutputConfig::default().output_dir);

    let schedule_hours = parse_var(&lookup, "SCHEDULE_HOURS")?
        .or(file.schedule.hours)
        .unwrap_or(DEFAULT_SCHEDULE_HOURS);

    Ok(Config {
        base_urls,
        crawler,
        output: OutputConfig {
            output_dir: resolve(output_dir),
        },
        schedule_hours,
        excluded_keywords: EXCLUDED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
    })
}

/// Computes a SHA-256 hash of the effective configuration
///
/// This is stored with each run so history entries can be grouped by the
/// settings they were produced with.
pub fn compute_config_hash(config: &Config) -> String {
    let canonical = serde_json::to_vec(config).unwrap_or_default();
    hex::encode(Sha256::digest(&canonical))
}

/// Splits a comma-separated list, trimming entries and dropping empty ones
fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

/// Anchors a relative output directory at the current working directory
fn resolve(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_sources(
            FileConfig::default(),
            lookup_from(&[("BASE_URLS", "https://example.com")]),
        )
        .unwrap();

        assert_eq!(config.base_urls, vec!["https://example.com"]);
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 100);
        assert_eq!(config.crawler.delay_between_requests, 1.0);
        assert_eq!(config.crawler.timeout, 30);
        assert_eq!(config.crawler.max_concurrent, 5);
        assert_eq!(config.schedule_hours, 12);
        assert!(config.output.output_dir.ends_with("crawler_output"));
        assert!(config.excluded_keywords.contains(&"login".to_string()));
        assert!(config.allowed_extensions.contains(".aspx"));
    }

    #[test]
    fn test_base_urls_are_split_and_trimmed() {
        let config = from_sources(
            FileConfig::default(),
            lookup_from(&[("BASE_URLS", " https://a.com , https://b.com,, ")]),
        )
        .unwrap();

        assert_eq!(config.base_urls, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_missing_base_urls() {
        let result = from_sources(FileConfig::default(), lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("BASE_URLS"))));

        let result = from_sources(FileConfig::default(), lookup_from(&[("BASE_URLS", " , ")]));
        assert!(matches!(result, Err(ConfigError::Missing("BASE_URLS"))));
    }

    #[test]
    fn test_invalid_number() {
        let result = from_sources(
            FileConfig::default(),
            lookup_from(&[("BASE_URLS", "https://a.com"), ("MAX_PAGES", "lots")]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "MAX_PAGES",
                ..
            })
        ));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = create_temp_config(
            r#"
base-urls = ["https://file.example.com"]

[crawler]
max-depth = 5
max-pages = 10
delay-between-requests = 0.5

[output]
output-dir = "/tmp/folio-file"

[schedule]
hours = 6
"#,
        );
        let file_config = read_config_file(file.path()).unwrap();

        let config = from_sources(file_config, lookup_from(&[("MAX_PAGES", "42")])).unwrap();

        assert_eq!(config.base_urls, vec!["https://file.example.com"]);
        assert_eq!(config.crawler.max_depth, 5);
        assert_eq!(config.crawler.max_pages, 42);
        assert_eq!(config.crawler.delay_between_requests, 0.5);
        assert_eq!(config.output.output_dir, PathBuf::from("/tmp/folio-file"));
        assert_eq!(config.schedule_hours, 6);
    }

    #[test]
    fn test_unknown_file_key_rejected() {
        let file = create_temp_config("[crawler]\nmax-dept = 2\n");
        assert!(matches!(
            read_config_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_compute_config_hash() {
        let lookup = lookup_from(&[("BASE_URLS", "https://a.com")]);
        let config1 = from_sources(FileConfig::default(), &lookup).unwrap();
        let config2 = from_sources(FileConfig::default(), &lookup).unwrap();
        assert_eq!(compute_config_hash(&config1), compute_config_hash(&config2));
        assert_eq!(compute_config_hash(&config1).len(), 64);

        let mut changed = config1.clone();
        changed.crawler.max_pages = 7;
        assert_ne!(compute_config_hash(&config1), compute_config_hash(&changed));
    }
}
