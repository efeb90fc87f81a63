//! Downloader module for saving discovered images
//!
//! This module handles:
//! - Deriving collision-free, filesystem-safe filenames
//! - Fetching and validating a single image
//! - Running a bounded pool of downloads with progress events

mod filename;
mod pool;
mod worker;

pub use filename::{
    extension_for_content_type, hashed_stem, safe_filename_from_url, split_extension, url_digest,
    DEFAULT_EXTENSION, MAX_STEM_LEN,
};
pub use pool::{download_all, DEFAULT_MAX_WORKERS};
pub use worker::{download_one, write_unique};

use std::path::PathBuf;

/// Outcome of downloading one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// The image was written to `path`
    Saved { url: String, path: PathBuf },

    /// Nothing was written
    Failed { url: String, reason: String },
}

impl DownloadResult {
    /// Creates a failure record
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Aggregated outcome of a download batch
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// `(url, saved path)` pairs in completion order
    pub successes: Vec<(String, PathBuf)>,

    /// Human-readable failure descriptions in completion order
    pub failures: Vec<String>,
}

/// A progress event: `completed` of `total` downloads have finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
}

impl Progress {
    /// Completion ratio in `[0, 1]`, with the total floored at 1
    pub fn fraction(&self) -> f64 {
        let total = self.total.max(1);
        (self.completed.min(total) as f64) / (total as f64)
    }
}
