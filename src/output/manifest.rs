//! Run manifest (`manifest.json`)

use crate::download::DownloadReport;
use crate::output::OutputResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed manifest filename inside the output directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Default cap on the number of `data:` references recorded
pub const DATA_URL_SAMPLE_LIMIT: usize = 50;

/// One downloaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    pub path: String,
}

/// Summary document written once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Crawled pages in crawl order
    pub source_pages: Vec<String>,

    /// Saved images
    pub downloaded: Vec<ManifestEntry>,

    /// Failure descriptions
    pub failed: Vec<String>,

    /// Sample of inline `data:image/...` references
    pub data_urls: Vec<String>,

    /// Linked stylesheets that were scanned
    pub css_files: Vec<String>,

    /// RFC 3339 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Manifest {
    /// Builds a manifest from the pieces of a finished run
    ///
    /// At most `data_url_limit` data references are kept, in the order given.
    pub fn new<D, C>(
        source_pages: Vec<String>,
        report: &DownloadReport,
        data_urls: D,
        data_url_limit: usize,
        css_files: C,
    ) -> Self
    where
        D: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
    {
        Self {
            source_pages,
            downloaded: report
                .successes
                .iter()
                .map(|(url, path)| ManifestEntry {
                    url: url.clone(),
                    path: path.display().to_string(),
                })
                .collect(),
            failed: report.failures.clone(),
            data_urls: data_urls.into_iter().take(data_url_limit).collect(),
            css_files: css_files.into_iter().collect(),
            created_at: None,
        }
    }

    /// Stamps the manifest with the current local time
    pub fn with_timestamp(mut self) -> Self {
        self.created_at = Some(
            chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
        );
        self
    }
}

/// Writes `manifest.json` (pretty-printed UTF-8) into `out_dir`, replacing
/// any existing file
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written manifest
/// * `Err(OutputError)` - Serialization or I/O failure
pub fn write_manifest(out_dir: &Path, manifest: &Manifest) -> OutputResult<PathBuf> {
    let path = out_dir.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    tracing::debug!("Wrote manifest to {}", path.display());
    Ok(path)
}

/// Reads a manifest back from disk
pub fn read_manifest(path: &Path) -> OutputResult<Manifest> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
