//! Crawler coordinator - crawl orchestration for one category
//!
//! This module ties the crawl of a category together:
//! - Fetching and parsing the listing page
//! - Filtering vehicle links against the allowed domains
//! - Fetching every detail page concurrently under the scheduler's limits
//! - Collecting the results in listing order

use crate::config::Config;
use crate::crawler::parser::{parse_detail_page, parse_listing_page, VehicleLink};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{build_http_client, fetch_url};
use crate::records::{Category, RawVehicleRecord};
use crate::url::{extract_domain, is_domain_allowed, listing_slug};
use crate::IngestError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
///
/// One coordinator is reused for every category of a run, so the per-domain
/// spacing carries over from one category to the next.
pub struct Coordinator {
    client: Client,
    scheduler: Arc<Scheduler>,
    allowed_domains: Vec<String>,
}

impl Coordinator {
    /// Creates a new coordinator from the configuration
    pub fn new(config: &Config) -> Result<Self, IngestError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self {
            client,
            scheduler: Arc::new(Scheduler::new(&config.crawler)),
            allowed_domains: config.crawler.allowed_domains.clone(),
        })
    }

    /// Crawls one category into raw vehicle records
    ///
    /// This method:
    /// 1. Fetches and parses the category's listing page
    /// 2. Skips vehicle links outside the allowed domains
    /// 3. Spawns one task per detail page and waits for all of them
    /// 4. Returns the vehicles in listing order
    ///
    /// A listing page failure fails the category. A detail page failure drops
    /// only that vehicle.
    pub async fn crawl_category(
        &self,
        category: &Category,
    ) -> Result<Vec<RawVehicleRecord>, IngestError> {
        let start_time = Instant::now();
        tracing::info!(
            "Crawling category '{}' from {}",
            category.name,
            category.listing_url
        );

        let listing_url = Url::parse(&category.listing_url)?;
        let (final_url, body) = self.fetch_page(&listing_url).await?;
        let base_url = Url::parse(&final_url)?;

        let links = parse_listing_page(&body, &base_url).map_err(|message| {
            IngestError::HtmlParse {
                url: final_url.clone(),
                message,
            }
        })?;
        tracing::info!(
            "Found {} vehicles on listing page of '{}'",
            links.len(),
            category.name
        );

        let mut tasks = JoinSet::new();
        for (index, link) in links.into_iter().enumerate() {
            if !self.is_allowed(&link) {
                tracing::debug!(
                    "Skipping {}: domain not in allowed domains",
                    link.detail_page_url
                );
                continue;
            }

            let client = self.client.clone();
            let scheduler = Arc::clone(&self.scheduler);
            tasks.spawn(async move {
                let vehicle = crawl_vehicle(&client, &scheduler, link).await;
                (index, vehicle)
            });
        }

        let mut collected = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(vehicle))) => collected.push((index, vehicle)),
                Ok((_, None)) => {}
                Err(e) => tracing::error!("Detail page task failed: {}", e),
            }
        }
        collected.sort_by_key(|(index, _)| *index);

        let vehicles: Vec<RawVehicleRecord> =
            collected.into_iter().map(|(_, vehicle)| vehicle).collect();

        tracing::info!(
            "Crawled category '{}': {} vehicles in {:?}",
            category.name,
            vehicles.len(),
            start_time.elapsed()
        );

        Ok(vehicles)
    }

    fn is_allowed(&self, link: &VehicleLink) -> bool {
        Url::parse(&link.detail_page_url)
            .ok()
            .and_then(|url| extract_domain(&url))
            .map(|domain| is_domain_allowed(&domain, &self.allowed_domains))
            .unwrap_or(false)
    }

    async fn fetch_page(&self, url: &Url) -> Result<(String, String), IngestError> {
        fetch_scheduled(&self.client, &self.scheduler, url).await
    }
}

/// Fetches a page after obtaining a slot from the scheduler
async fn fetch_scheduled(
    client: &Client,
    scheduler: &Scheduler,
    url: &Url,
) -> Result<(String, String), IngestError> {
    let domain = extract_domain(url).ok_or_else(|| IngestError::Fetch {
        url: url.to_string(),
        message: "URL has no host".to_string(),
    })?;

    let _slot = scheduler
        .acquire(&domain)
        .await
        .ok_or_else(|| IngestError::Fetch {
            url: url.to_string(),
            message: "scheduler closed".to_string(),
        })?;

    fetch_url(client, url.as_str()).await.into_page(url.as_str())
}

/// Fetches and parses one vehicle's detail page
///
/// Returns None (after logging) when the page cannot be fetched or parsed.
async fn crawl_vehicle(
    client: &Client,
    scheduler: &Scheduler,
    link: VehicleLink,
) -> Option<RawVehicleRecord> {
    let slug = listing_slug(&link.detail_page_url).unwrap_or_else(|| link.detail_page_url.clone());

    let detail_url = match Url::parse(&link.detail_page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Dropping vehicle {}: invalid URL: {}", slug, e);
            return None;
        }
    };

    let (final_url, body) = match fetch_scheduled(client, scheduler, &detail_url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Dropping vehicle {}: {}", slug, e);
            return None;
        }
    };

    let base_url = Url::parse(&final_url).unwrap_or(detail_url);
    match parse_detail_page(&body, &base_url) {
        Ok(raw_parts) => {
            tracing::debug!("Vehicle {}: {} parts", slug, raw_parts.len());
            Some(RawVehicleRecord {
                display_name: link.display_name,
                detail_page_url: link.detail_page_url,
                raw_parts,
            })
        }
        Err(e) => {
            tracing::warn!("Dropping vehicle {}: parse error: {}", slug, e);
            None
        }
    }
}
