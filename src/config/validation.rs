use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_urls(&config.base_urls)?;
    validate_crawler_config(&config.crawler)?;
    validate_schedule(config.schedule_hours)?;
    Ok(())
}

/// Validates seed URLs: non-empty, absolute http(s) with a host
fn validate_base_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Missing("BASE_URLS"));
    }

    for raw in urls {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                raw
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                raw
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth and max_pages are unsigned; zero is a legal (if useless) budget

    if Duration::try_from_secs_f64(config.delay_between_requests).is_err() {
        return Err(ConfigError::Validation(format!(
            "DELAY_BETWEEN_REQUESTS must be a non-negative number of seconds, got {}",
            config.delay_between_requests
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "TIMEOUT must be >= 1 second, got {}",
            config.timeout
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "MAX_CONCURRENT must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    Ok(())
}

fn validate_schedule(hours: u64) -> Result<(), ConfigError> {
    if hours < 1 {
        return Err(ConfigError::Validation(format!(
            "SCHEDULE_HOURS must be >= 1, got {}",
            hours
        )));
    }
    Ok(())
}
