//! Configuration module for Folio
//!
//! Settings come from the process environment (optionally seeded by a `.env`
//! file), layered over an optional TOML file, and are validated before any
//! crawling starts.
//!
//! # Example
//!
//! ```no_run
//! use folio::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FileConfig, OutputConfig, ALLOWED_EXTENSIONS, EXCLUDED_KEYWORDS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, from_sources, load_config, read_config_file};
pub use validation::validate;
