//! Single-image download: fetch, validate, name, write

use crate::download::filename::{hashed_stem, safe_filename_from_url, split_extension};
use crate::download::DownloadResult;
use crate::fetcher::Fetcher;
use crate::url::is_probable_image_url;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Downloads one image URL into `out_dir`
///
/// # Flow
///
/// 1. Fetch the body; a fetch failure or empty body is a failure
/// 2. Accept the body only if the URL has an image extension or the
///    response declares an `image/*` content type
/// 3. Derive a safe filename and claim the first free variant
///    (`name`, `name_1`, `name_2`, ...) with an atomic create-if-absent
/// 4. On a filesystem error, retry once as `image_<sha1>.bin`
pub async fn download_one(fetcher: &Fetcher, url: &str, out_dir: &Path) -> DownloadResult {
    let fetched = match fetcher.fetch_bytes(url).await {
        Ok(fetched) => fetched,
        Err(e) => return DownloadResult::failed(url, e.to_string()),
    };

    if fetched.bytes.is_empty() {
        return DownloadResult::failed(url, "empty response body");
    }

    let content_type = fetched.content_type.as_deref();
    let declared_image = content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);

    if !is_probable_image_url(url) && !declared_image {
        return DownloadResult::failed(
            url,
            format!(
                "not an image (content-type: {})",
                content_type.unwrap_or("none")
            ),
        );
    }

    let name = safe_filename_from_url(url, content_type);

    match write_unique(out_dir, &name, &fetched.bytes).await {
        Ok(path) => {
            tracing::debug!("Saved {} -> {}", url, path.display());
            DownloadResult::Saved {
                url: url.to_string(),
                path,
            }
        }
        Err(e) => {
            tracing::warn!("Could not write {} for {}: {}", name, url, e);
            let fallback = out_dir.join(format!("{}.bin", hashed_stem(url)));
            match tokio::fs::write(&fallback, &fetched.bytes).await {
                Ok(()) => DownloadResult::Saved {
                    url: url.to_string(),
                    path: fallback,
                },
                Err(e) => DownloadResult::failed(url, format!("write failed: {}", e)),
            }
        }
    }
}

/// Writes `bytes` under the first free variant of `name` in `out_dir`
///
/// Candidates are opened with `create_new`, so a name already claimed by
/// another worker (or an earlier run) is never overwritten.
pub async fn write_unique(out_dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let (stem, ext) = split_extension(name);
    let mut candidate = out_dir.join(name);
    let mut counter = 1u32;

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(mut file) => {
                let written = async {
                    file.write_all(bytes).await?;
                    file.flush().await
                }
                .await;

                return match written {
                    Ok(()) => Ok(candidate),
                    Err(e) => {
                        let _ = tokio::fs::remove_file(&candidate).await;
                        Err(e)
                    }
                };
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                candidate = out_dir.join(format!("{}_{}{}", stem, counter, ext));
                counter += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
