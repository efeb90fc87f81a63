//! Output module for packaging run results
//!
//! This module handles:
//! - Writing the `manifest.json` summary of a run
//! - Compressing the output directory into a sibling zip archive

mod archive;
mod manifest;

pub use archive::{archive_path_for, zip_output_folder};
pub use manifest::{
    read_manifest, write_manifest, Manifest, ManifestEntry, DATA_URL_SAMPLE_LIMIT,
    MANIFEST_FILE_NAME,
};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to walk output directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
