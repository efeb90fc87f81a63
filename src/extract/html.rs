//! HTML parser for extracting image and stylesheet references
//!
//! This module walks a parsed document and collects:
//! - Image candidates from attributes, meta tags, preload links and inline CSS
//! - Linked stylesheets to be fetched and scanned afterwards

use crate::extract::css::inline_url_tokens;
use crate::extract::PageImages;
use crate::url::absolute_url;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// `meta` property/name values that carry a social preview image
pub const SOCIAL_IMAGE_META: &[&str] = &[
    "og:image",
    "og:image:url",
    "twitter:image",
    "twitter:image:src",
];

/// Parses HTML content and extracts image and stylesheet references
///
/// # Image Sources
///
/// - `<img src>`
/// - `<img srcset>` and `<source srcset>` (URL token of each candidate)
/// - `<meta property|name="og:image|og:image:url|twitter:image|twitter:image:src" content>`
/// - `<link rel="preload" as="image" href>`
/// - `url(...)` inside any `style="..."` attribute
/// - `url(...)` inside `<style>` blocks
///
/// `<link rel="stylesheet" href>` targets are returned separately.
///
/// Every reference is resolved against `base_url`. Nothing is filtered by
/// extension here; non-image bodies are rejected at download time.
///
/// # Example
///
/// ```
/// use image_sweep::extract::extract_from_html;
/// use url::Url;
///
/// let html = r#"<html><body><img src="cat.png"></body></html>"#;
/// let base_url = Url::parse("https://example.test/").unwrap();
/// let found = extract_from_html(html, &base_url);
/// assert!(found.images.contains("https://example.test/cat.png"));
/// ```
pub fn extract_from_html(html: &str, base_url: &Url) -> PageImages {
    let document = Html::parse_document(html);
    let mut found = PageImages::default();

    let add_image = |href: &str, found: &mut PageImages| {
        if let Some(url) = absolute_url(href, base_url) {
            found.images.insert(url);
        }
    };

    // <img src>
    if let Ok(selector) = Selector::parse("img[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                add_image(src, &mut found);
            }
        }
    }

    // <img srcset>, <source srcset>
    if let Ok(selector) = Selector::parse("img[srcset], source[srcset]") {
        for element in document.select(&selector) {
            if let Some(srcset) = element.value().attr("srcset") {
                for candidate in srcset_urls(srcset) {
                    add_image(candidate, &mut found);
                }
            }
        }
    }

    // Open Graph / Twitter card images
    if let Ok(selector) = Selector::parse("meta[content]") {
        for element in document.select(&selector) {
            if is_social_image_meta(&element) {
                if let Some(content) = element.value().attr("content") {
                    add_image(content, &mut found);
                }
            }
        }
    }

    // Preloaded images and linked stylesheets
    if let Ok(selector) = Selector::parse("link[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let rel = element.value().attr("rel").unwrap_or_default().to_lowercase();
            let as_type = element.value().attr("as").unwrap_or_default();

            if rel.contains("preload") && as_type.eq_ignore_ascii_case("image") {
                add_image(href, &mut found);
            }

            if rel.split_whitespace().any(|token| token == "stylesheet") {
                if let Some(url) = absolute_url(href, base_url) {
                    found.stylesheets.insert(url);
                }
            }
        }
    }

    // Inline style attributes
    if let Ok(selector) = Selector::parse("[style]") {
        for element in document.select(&selector) {
            if let Some(style) = element.value().attr("style") {
                for token in inline_url_tokens(style) {
                    add_image(token, &mut found);
                }
            }
        }
    }

    // <style> blocks
    if let Ok(selector) = Selector::parse("style") {
        for element in document.select(&selector) {
            let css = element.text().collect::<Vec<_>>().join("\n");
            for token in inline_url_tokens(&css) {
                add_image(token, &mut found);
            }
        }
    }

    found
}

/// Splits a `srcset` value into the URL part of each candidate
///
/// Width/density descriptors after the first space are ignored.
pub fn srcset_urls(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
}

fn is_social_image_meta(element: &ElementRef) -> bool {
    let key = element
        .value()
        .attr("property")
        .filter(|value| !value.is_empty())
        .or_else(|| element.value().attr("name"))
        .unwrap_or_default()
        .to_lowercase();

    SOCIAL_IMAGE_META.contains(&key.as_str())
}
