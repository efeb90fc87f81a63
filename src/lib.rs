//! Image-Sweep: a site image harvester
//!
//! This crate crawls a website (optionally following same-site links), finds
//! image references in HTML and CSS, downloads them concurrently into a local
//! directory and packages the result as a manifest plus a zip archive.

pub mod config;
pub mod crawler;
pub mod download;
pub mod extract;
pub mod fetcher;
pub mod output;
pub mod pipeline;
pub mod url;

use thiserror::Error;

/// Main error type for Image-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Image-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::crawl_site;
pub use download::{download_all, DownloadReport, DownloadResult, Progress};
pub use extract::{collect_images_from_page, PageImages};
pub use fetcher::{FetchError, Fetcher};
pub use output::{zip_output_folder, Manifest};
pub use pipeline::RunSummary;
