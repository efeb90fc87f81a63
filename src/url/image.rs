/// File extensions recognized as images (lowercase, with leading dot)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg", ".avif", ".tiff", ".tif",
];

/// Returns true if `ext` (with leading dot) is a recognized image extension
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Checks whether a URL string ends with a recognized image extension
///
/// The comparison is case-insensitive and ignores the query and fragment.
///
/// # Examples
///
/// ```
/// use image_sweep::url::is_probable_image_url;
///
/// assert!(is_probable_image_url("https://a.com/cat.PNG?size=large"));
/// assert!(!is_probable_image_url("https://a.com/avatar?id=7"));
/// ```
pub fn is_probable_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let without_query = lower.split('?').next().unwrap_or_default();
    let path = without_query.split('#').next().unwrap_or_default();

    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
