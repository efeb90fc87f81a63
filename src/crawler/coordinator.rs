//! Crawler coordinator - breadth-first page discovery
//!
//! Pages are visited one at a time in discovery order. Only links that stay
//! on the start URL's network location are followed, and the walk stops
//! once the page budget is spent or the frontier runs dry.

use crate::crawler::parser::extract_anchor_links;
use crate::fetcher::Fetcher;
use crate::url::{parse_start_url, same_site};
use crate::SweepError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Crawls a site breadth-first and returns the visited pages in order
///
/// # Crawl Rules
///
/// 1. The fragment-free start URL seeds the queue and anchors the site
/// 2. Dequeue FIFO; skip URLs already visited
/// 3. Mark visited and record before fetching, so unreachable pages still
///    count against the budget
/// 4. Enqueue every same-site, not-yet-visited anchor target
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for page HTML
/// * `start_url` - The page to start from
/// * `max_pages` - Maximum number of pages to visit (at least 1)
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Visited page URLs in crawl order
/// * `Err(SweepError)` - Invalid start URL or zero page budget
pub async fn crawl_site(
    fetcher: &Fetcher,
    start_url: &str,
    max_pages: usize,
) -> Result<Vec<String>, SweepError> {
    if max_pages == 0 {
        return Err(SweepError::InvalidArgument(
            "max_pages must be at least 1".to_string(),
        ));
    }

    let start = parse_start_url(start_url)?;
    let origin = start.to_string();

    let mut queue: VecDeque<String> = VecDeque::from([origin.clone()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut pages: Vec<String> = Vec::new();

    tracing::info!("Crawling up to {} pages from {}", max_pages, origin);

    while pages.len() < max_pages {
        let Some(url) = queue.pop_front() else {
            tracing::debug!("Frontier is empty, crawl complete");
            break;
        };

        if !visited.insert(url.clone()) {
            continue;
        }
        pages.push(url.clone());

        let html = match fetcher.fetch_text(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Could not fetch {} while crawling: {}", url, e);
                continue;
            }
        };

        let Ok(base_url) = Url::parse(&url) else {
            continue;
        };

        let mut discovered = 0usize;
        for link in extract_anchor_links(&html, &base_url) {
            if same_site(&link, &origin) && !visited.contains(&link) {
                queue.push_back(link);
                discovered += 1;
            }
        }

        tracing::debug!(
            "Visited {} ({} of {}), queued {} links, {} in frontier",
            url,
            pages.len(),
            max_pages,
            discovered,
            queue.len()
        );
    }

    tracing::info!("Crawl finished with {} pages", pages.len());
    Ok(pages)
}
