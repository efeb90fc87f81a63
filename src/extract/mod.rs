//! Extractor module for discovering image references
//!
//! This module contains:
//! - HTML scanning for image attributes, meta tags and inline CSS
//! - CSS scanning for `url(...)` tokens
//! - Per-page collection that follows linked stylesheets

mod css;
mod html;

pub use css::{extract_from_css, inline_url_tokens, url_tokens};
pub use html::{extract_from_html, srcset_urls, SOCIAL_IMAGE_META};

use crate::fetcher::Fetcher;
use std::collections::BTreeSet;
use url::Url;

/// Image and stylesheet references found on one page (or accumulated over many)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageImages {
    /// Absolute image URLs and verbatim `data:` references
    pub images: BTreeSet<String>,

    /// Absolute URLs of linked stylesheets
    pub stylesheets: BTreeSet<String>,
}

impl PageImages {
    /// Returns true if nothing was found
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.stylesheets.is_empty()
    }

    /// Unions another result into this one
    pub fn merge(&mut self, other: PageImages) {
        self.images.extend(other.images);
        self.stylesheets.extend(other.stylesheets);
    }
}

/// Collects every image reference reachable from a page
///
/// Fetches the page, scans its HTML, then fetches each linked stylesheet
/// and scans it with the stylesheet's own URL as base. An unreachable page
/// (or unparsable page URL) yields an empty result rather than an error;
/// an unreachable stylesheet is skipped.
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for the page and its stylesheets
/// * `page_url` - Absolute URL of the page
pub async fn collect_images_from_page(fetcher: &Fetcher, page_url: &str) -> PageImages {
    let base_url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping unparsable page URL {}: {}", page_url, e);
            return PageImages::default();
        }
    };

    let html = match fetcher.fetch_text(page_url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Could not fetch page {}: {}", page_url, e);
            return PageImages::default();
        }
    };

    let mut found = extract_from_html(&html, &base_url);

    for css_url in found.stylesheets.clone() {
        let Ok(css_base) = Url::parse(&css_url) else {
            continue;
        };

        match fetcher.fetch_text(&css_url).await {
            Ok(css) => {
                let css_images = extract_from_css(&css, &css_base);
                tracing::debug!("{} image references in {}", css_images.len(), css_url);
                found.images.extend(css_images);
            }
            Err(e) => tracing::debug!("Skipping stylesheet {}: {}", css_url, e),
        }
    }

    found
}
