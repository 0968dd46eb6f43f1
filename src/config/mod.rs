//! Configuration module for wavecrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use wavecrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wavecrawl.toml")).unwrap();
//! println!("Crawler will use depth: {}", config.crawler.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HostsConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_crawler_config};
