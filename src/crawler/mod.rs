//! Crawler module for same-site page discovery
//!
//! This module contains the crawl logic, including:
//! - Anchor extraction from fetched pages
//! - Breadth-first traversal bounded by a page budget

mod coordinator;
mod parser;

pub use coordinator::crawl_site;
pub use parser::extract_anchor_links;
