//! Filename derivation for downloaded images

use crate::url::is_image_extension;
use sha1::{Digest, Sha1};
use url::Url;

/// Maximum length of a sanitized filename stem
pub const MAX_STEM_LEN: usize = 120;

/// Extension used when neither the URL nor the content type names one
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Returns the first 12 hex characters of the SHA-1 of `url`
pub fn url_digest(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}

/// Synthetic name for URLs without a usable base name: `image_<digest>`
pub fn hashed_stem(url: &str) -> String {
    format!("image_{}", url_digest(url))
}

/// Splits a filename into stem and extension (extension keeps its dot)
///
/// Leading dots belong to the stem, so `.hidden` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => name.split_at(dot),
        _ => (name, ""),
    }
}

/// Maps an `image/*` content type to a file extension
///
/// `jpeg` becomes `.jpg` and `svg+xml` becomes `.svg`; other subtypes are
/// used as-is (sanitized). Returns `None` for non-image content types.
pub fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let (kind, subtype) = essence.split_once('/')?;
    if !kind.eq_ignore_ascii_case("image") {
        return None;
    }

    let subtype = subtype.trim().to_ascii_lowercase();
    let ext = match subtype.as_str() {
        "" => return None,
        "jpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => sanitize(other),
    };
    Some(format!(".{}", ext))
}

/// Derives a filesystem-safe filename for an image URL
///
/// # Rules
///
/// 1. Use the URL path's base name; fall back to `image_<sha1>` when empty,
///    `/`, `.` or `..`
/// 2. Keep the name's extension when it is a recognized image extension,
///    otherwise take it from an `image/*` content type, otherwise `.jpg`
/// 3. Replace characters outside `[A-Za-z0-9._-]` in the stem with `_`
///    and cut the stem to 120 characters
///
/// # Examples
///
/// ```
/// use image_sweep::download::safe_filename_from_url;
///
/// assert_eq!(safe_filename_from_url("https://a.com/p/cat.png?x=1", None), "cat.png");
/// assert_eq!(safe_filename_from_url("https://a.com/avatar", Some("image/jpeg")), "avatar.jpg");
/// ```
pub fn safe_filename_from_url(url: &str, content_type: Option<&str>) -> String {
    let base_name = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path()
                .rsplit('/')
                .next()
                .map(str::to_string)
        })
        .unwrap_or_default();

    let name = if matches!(base_name.as_str(), "" | "/" | "." | "..") {
        hashed_stem(url)
    } else {
        base_name
    };

    let (stem, ext) = split_extension(&name);
    let (stem, ext) = if is_image_extension(ext) {
        (stem.to_string(), ext.to_string())
    } else {
        let guessed = content_type
            .and_then(extension_for_content_type)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        (stem.to_string(), guessed)
    };

    let mut clean_stem = sanitize(&stem);
    clean_stem.truncate(MAX_STEM_LEN);
    format!("{}{}", clean_stem, ext)
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
