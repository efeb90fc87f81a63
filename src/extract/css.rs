//! `url(...)` token extraction from CSS text

use crate::url::{absolute_url, is_data_image, is_data_uri};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Matches `url(...)` with an optional matching pair of quotes
static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"')]+)"|'([^"')]+)'|([^"')]+))\s*\)"#)
        .expect("CSS url() pattern is valid")
});

/// Matches `url(...)` in inline HTML styles, where each quote is optional on
/// its own
static INLINE_CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("inline url() pattern is valid")
});

/// Returns every raw `url(...)` token in `css`, trimmed, in source order
pub fn url_tokens(css: &str) -> Vec<&str> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Like [`url_tokens`], but for `style` attributes and `<style>` blocks
///
/// Quotes need not match: `url('a.png")` yields `a.png`.
pub fn inline_url_tokens(css: &str) -> Vec<&str> {
    INLINE_CSS_URL
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Extracts image references from a stylesheet
///
/// `data:image/...` tokens are kept verbatim, any other `data:` token is
/// dropped, and everything else is resolved against `base_url`.
///
/// # Example
///
/// ```
/// use image_sweep::extract::extract_from_css;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/css/site.css").unwrap();
/// let css = r#"body { background: url("../img/bg.png") }"#;
/// let images = extract_from_css(css, &base);
/// assert!(images.contains("https://a.com/img/bg.png"));
/// ```
pub fn extract_from_css(css: &str, base_url: &Url) -> BTreeSet<String> {
    let mut images = BTreeSet::new();

    for token in url_tokens(css) {
        if is_data_uri(token) {
            if is_data_image(token) {
                images.insert(token.to_string());
            }
            continue;
        }

        if let Some(absolute) = absolute_url(token, base_url) {
            images.insert(absolute);
        }
    }

    images
}
