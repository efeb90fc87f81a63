//! Bounded-concurrency fan-out over a list of image URLs

use crate::download::worker::download_one;
use crate::download::{DownloadReport, DownloadResult, Progress};
use crate::fetcher::Fetcher;
use crate::SweepError;
use futures::stream::{self, StreamExt};
use std::path::Path;
use tokio::sync::mpsc;

/// Default number of concurrent downloads
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Downloads every URL into `out_dir` with at most `max_workers` in flight
///
/// Each download runs in its own task; a task that panics is recorded as a
/// failure for its URL instead of aborting the batch. Results are folded in
/// completion order by this function alone, so no shared state is locked.
///
/// # Progress
///
/// When `progress` is given, one `Progress { total, completed: 0 }` event is
/// sent before dispatch and one more after every completion. The channel is
/// bounded: the subscriber must keep draining it while the batch runs. A
/// dropped receiver is ignored.
///
/// # Returns
///
/// * `Ok(DownloadReport)` - Every URL finished, successfully or not
/// * `Err(SweepError)` - `max_workers` was zero or `out_dir` could not be created
pub async fn download_all(
    fetcher: &Fetcher,
    urls: &[String],
    out_dir: &Path,
    max_workers: usize,
    progress: Option<mpsc::Sender<Progress>>,
) -> Result<DownloadReport, SweepError> {
    if max_workers == 0 {
        return Err(SweepError::InvalidArgument(
            "max_workers must be at least 1".to_string(),
        ));
    }

    tokio::fs::create_dir_all(out_dir).await?;

    let total = urls.len();
    let mut completed = 0usize;
    let mut report = DownloadReport::default();

    notify(&progress, Progress { total, completed }).await;
    tracing::info!(
        "Downloading {} images to {} with {} workers",
        total,
        out_dir.display(),
        max_workers
    );

    let mut results = stream::iter(urls.iter().cloned())
        .map(|url| {
            let fetcher = fetcher.clone();
            let out_dir = out_dir.to_path_buf();
            async move {
                let task_url = url.clone();
                let handle =
                    tokio::spawn(async move { download_one(&fetcher, &task_url, &out_dir).await });
                match handle.await {
                    Ok(result) => result,
                    Err(e) => DownloadResult::failed(url, format!("download task aborted: {}", e)),
                }
            }
        })
        .buffer_unordered(max_workers);

    while let Some(result) = results.next().await {
        match result {
            DownloadResult::Saved { url, path } => report.successes.push((url, path)),
            DownloadResult::Failed { url, reason } => {
                tracing::warn!("Download failed for {}: {}", url, reason);
                report.failures.push(format!("{} — {}", url, reason));
            }
        }

        completed += 1;
        notify(&progress, Progress { total, completed }).await;
    }

    tracing::info!(
        "Downloads finished: {} saved, {} failed",
        report.successes.len(),
        report.failures.len()
    );

    Ok(report)
}

async fn notify(progress: &Option<mpsc::Sender<Progress>>, event: Progress) {
    if let Some(tx) = progress {
        let _ = tx.send(event).await;
    }
}
