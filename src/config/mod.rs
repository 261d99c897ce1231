//! Configuration module for Sumi-Frame
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_frame::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("frame.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DiscoveryConfig, OutputConfig, RendererConfig, TargetConfig,
    DEFAULT_SKIP_PATTERNS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config};
pub use validation::validate;
