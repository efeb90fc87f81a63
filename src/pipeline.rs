//! End-to-end run: crawl, extract, download, package
//!
//! The crawl and extraction phases are sequential; only downloads run
//! concurrently. Packaging failures are recorded in the summary instead of
//! failing the run, since the downloaded files are already on disk.

use crate::config::Config;
use crate::crawler::crawl_site;
use crate::download::{download_all, Progress};
use crate::extract::{collect_images_from_page, PageImages};
use crate::fetcher::Fetcher;
use crate::output::{write_manifest, zip_output_folder, Manifest};
use crate::url::{is_data_image, is_data_uri, netloc, parse_start_url};
use crate::SweepError;
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use url::Url;

/// What a finished run produced
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pages scanned, in crawl order
    pub pages: Vec<String>,

    /// Distinct image references found (including `data:` ones)
    pub images_found: usize,

    /// Inline `data:image/...` references found
    pub data_urls: usize,

    /// Images saved to disk
    pub downloaded: usize,

    /// Images that could not be saved
    pub failed: usize,

    /// Where the images were written
    pub output_dir: PathBuf,

    /// Written manifest, if writing succeeded
    pub manifest_path: Option<PathBuf>,

    /// Produced archive, if archiving was enabled and succeeded
    pub archive_path: Option<PathBuf>,

    /// Non-fatal manifest/archive errors
    pub packaging_errors: Vec<String>,
}

/// Default output directory name: `images_<netloc>_<YYYYmmdd_HHMMSS>`
pub fn default_output_dir(start: &Url, now: DateTime<Local>) -> PathBuf {
    let host = netloc(start).unwrap_or_else(|| "site".to_string());
    PathBuf::from(format!(
        "images_{}_{}",
        host.replace(':', "_"),
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Splits image references into `(data_image_refs, downloadable_urls)`
///
/// `data:image/...` references go to the first list; other `data:` payloads
/// are dropped; everything else is downloadable. Both lists keep the set's
/// sorted order.
pub fn split_image_references(images: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
    let data = images
        .iter()
        .filter(|url| is_data_image(url))
        .cloned()
        .collect();
    let downloadable = images
        .iter()
        .filter(|url| !is_data_uri(url))
        .cloned()
        .collect();
    (data, downloadable)
}

/// Runs the full pipeline for one start URL
///
/// # Steps
///
/// 1. Pages: crawl when `config.crawler.enabled`, else just the start URL
/// 2. Collect image and stylesheet references from every page
/// 3. Download every non-`data:` reference into `out_dir`
/// 4. Write `manifest.json`
/// 5. Zip `out_dir` when `config.output.archive` is set
///
/// # Returns
///
/// * `Ok(RunSummary)` - The pipeline completed (individual images may have failed)
/// * `Err(SweepError)` - Invalid start URL or arguments, or `out_dir` unusable
pub async fn run(
    fetcher: &Fetcher,
    start_url: &str,
    config: &Config,
    out_dir: &Path,
    progress: Option<mpsc::Sender<Progress>>,
) -> Result<RunSummary, SweepError> {
    let start = parse_start_url(start_url)?;

    let pages = if config.crawler.enabled {
        crawl_site(fetcher, start.as_str(), config.crawler.max_pages).await?
    } else {
        vec![start.to_string()]
    };

    tracing::info!("Scanning {} page(s) for images", pages.len());
    let mut found = PageImages::default();
    for page in &pages {
        let page_images = collect_images_from_page(fetcher, page).await;
        tracing::info!(
            "Found {} images and {} stylesheets on {}",
            page_images.images.len(),
            page_images.stylesheets.len(),
            page
        );
        found.merge(page_images);
    }

    let (data_images, downloadable) = split_image_references(&found.images);
    tracing::info!(
        "Found {} images ({} downloadable, {} data URLs)",
        found.images.len(),
        downloadable.len(),
        data_images.len()
    );

    let report = download_all(
        fetcher,
        &downloadable,
        out_dir,
        config.downloader.max_workers,
        progress,
    )
    .await?;

    let mut summary = RunSummary {
        images_found: found.images.len(),
        data_urls: data_images.len(),
        downloaded: report.successes.len(),
        failed: report.failures.len(),
        output_dir: out_dir.to_path_buf(),
        ..RunSummary::default()
    };

    let manifest = Manifest::new(
        pages.clone(),
        &report,
        data_images,
        config.output.data_url_limit,
        found.stylesheets,
    )
    .with_timestamp();

    match write_manifest(out_dir, &manifest) {
        Ok(path) => summary.manifest_path = Some(path),
        Err(e) => {
            tracing::error!("Failed to write manifest: {}", e);
            summary
                .packaging_errors
                .push(format!("manifest: {}", e));
        }
    }

    if config.output.archive {
        match zip_output_folder(out_dir) {
            Ok(path) => summary.archive_path = Some(path),
            Err(e) => {
                tracing::error!("Failed to create archive: {}", e);
                summary.packaging_errors.push(format!("archive: {}", e));
            }
        }
    }

    summary.pages = pages;
    Ok(summary)
}
