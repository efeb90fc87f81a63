//! HTML parser for extracting crawlable links
//!
//! Every `<a href>` is resolved against the page URL and stripped of its
//! fragment. Scheme and site filtering happen in the crawl loop.

use crate::url::{absolute_url, strip_fragment};
use scraper::{Html, Selector};
use url::Url;

/// Extracts all anchor targets from an HTML page, in document order
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL used to resolve relative links
///
/// # Returns
///
/// Absolute, fragment-free URLs. Duplicates are preserved.
///
/// # Example
///
/// ```
/// use image_sweep::crawler::extract_anchor_links;
/// use url::Url;
///
/// let html = r##"<html><body><a href="/page#top">Link</a></body></html>"##;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_anchor_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract_anchor_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = absolute_url(href, base_url) {
                    links.push(strip_fragment(&absolute));
                }
            }
        }
    }

    links
}
