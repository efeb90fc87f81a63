//! Configuration module for Image-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use image_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Downloading with {} workers", config.downloader.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DownloaderConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, DATA_URL_LIMIT_MAX, MAX_WORKERS_LIMIT};
