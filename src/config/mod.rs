//! Configuration module for Sumi-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so an empty file (or no file at all) is a valid
//! configuration; command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Fetching with concurrency: {}", config.fetch.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{FetchConfig, OutputConfig, ScrapeConfig, DEFAULT_USER_AGENT, MAX_DURATION_SECS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
