//! Crawler module for catalog page fetching and processing
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching
//! - Listing and detail page parsing
//! - Per-domain request scheduling
//! - Per-category crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{parse_detail_page, parse_listing_page, VehicleLink};
pub use scheduler::{ScheduledFetch, Scheduler};
