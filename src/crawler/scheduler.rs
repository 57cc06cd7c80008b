//! Per-domain politeness scheduling
//!
//! This module handles:
//! - Per-domain concurrency limiting via semaphores
//! - Per-domain request spacing with random jitter
//! - Sharing one budget between hosts covered by the same allowed-domain pattern

use crate::config::CrawlerConfig;
use crate::state::DomainState;
use crate::url::politeness_key;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OwnedSemaphorePermit;

/// A fetch slot granted by the scheduler
///
/// The slot is released when this value is dropped.
pub struct ScheduledFetch {
    _permit: OwnedSemaphorePermit,
}

/// Scheduler hands out fetch slots while honoring per-domain limits
///
/// The scheduler coordinates:
/// - Per-domain in-flight limits (`max-concurrent-requests`)
/// - Per-domain spacing (`min-delay-ms` plus up to `random-delay-ms` of jitter)
///
/// A host matching an `allowed-domains` pattern is tracked under that pattern,
/// so `purkuosat.net` and `www.purkuosat.net` share one budget under
/// `*.purkuosat.net`. Other hosts are tracked on their own.
///
/// It is shared between concurrently running fetch tasks, so all mutable state
/// sits behind a mutex that is never held across an await point.
pub struct Scheduler {
    /// Per-domain state tracking
    domain_states: Mutex<HashMap<String, DomainState>>,

    /// Maximum concurrent fetches per domain
    max_in_flight: usize,

    /// Fixed part of the spacing between requests to one domain
    min_delay: Duration,

    /// Upper bound of the random jitter added to `min_delay`
    random_delay: Duration,

    /// Patterns that group hosts into one politeness budget
    allowed_domains: Vec<String>,
}

impl Scheduler {
    /// Creates a new scheduler from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            domain_states: Mutex::new(HashMap::new()),
            max_in_flight: config.max_concurrent_requests as usize,
            min_delay: Duration::from_millis(config.min_delay_ms),
            random_delay: Duration::from_millis(config.random_delay_ms),
            allowed_domains: config.allowed_domains.clone(),
        }
    }

    /// Spacing to apply before the next request: `min_delay` plus random jitter
    pub fn request_delay(&self) -> Duration {
        let jitter_ms = self.random_delay.as_millis() as u64;
        if jitter_ms == 0 {
            return self.min_delay;
        }
        self.min_delay + Duration::from_millis(fastrand::u64(0..=jitter_ms))
    }

    /// Waits until a request to `domain` may start
    ///
    /// This method:
    /// 1. Acquires one of the domain's in-flight slots
    /// 2. Picks the spacing for this request (jitter is drawn once)
    /// 3. Sleeps until the domain's last request is far enough in the past
    /// 4. Records the request and returns the slot
    ///
    /// Returns None only if the domain's semaphore was closed.
    pub async fn acquire(&self, domain: &str) -> Option<ScheduledFetch> {
        let key = politeness_key(domain, &self.allowed_domains);
        let slots = {
            let mut states = self.lock_states();
            states
                .entry(key.clone())
                .or_insert_with(|| DomainState::new(self.max_in_flight))
                .slots
                .clone()
        };

        let permit = slots.acquire_owned().await.ok()?;
        let delay = self.request_delay();

        loop {
            let wait = {
                let mut states = self.lock_states();
                let state = states
                    .entry(key.clone())
                    .or_insert_with(|| DomainState::new(self.max_in_flight));
                let now = Instant::now();
                match state.time_until_next_request(delay, now) {
                    None => {
                        state.record_request(now);
                        None
                    }
                    Some(wait) => Some(wait),
                }
            };

            match wait {
                None => break,
                Some(wait) => {
                    tracing::trace!("Waiting {:?} before next request to {}", wait, domain);
                    tokio::time::sleep(wait).await;
                }
            }
        }

        Some(ScheduledFetch { _permit: permit })
    }

    fn lock_states(&self) -> std::sync::MutexGuard<'_, HashMap<String, DomainState>> {
        self.domain_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
