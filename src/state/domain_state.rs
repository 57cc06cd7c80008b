use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Tracks the politeness state of one crawled domain
///
/// Holds the per-domain in-flight fetch slots and the time of the most recent
/// request, which together bound parallelism and request spacing.
#[derive(Debug, Clone)]
pub struct DomainState {
    /// Timestamp of the last request to this domain
    pub last_request_time: Option<Instant>,

    /// In-flight fetch slots for this domain
    pub slots: Arc<Semaphore>,
}

impl DomainState {
    /// Creates a new DomainState allowing `max_in_flight` concurrent fetches
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            last_request_time: None,
            slots: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Records that a request was started against this domain
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_domain_state() {
        let state = DomainState::new(4);
        assert!(state.last_request_time.is_none());
        assert_eq!(state.slots.available_permits(), 4);
    }

    #[test]
    fn test_zero_slots_is_raised_to_one() {
        let state = DomainState::new(0);
        assert_eq!(state.slots.available_permits(), 1);
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = DomainState::new(1);
        let now = Instant::now();
        assert_eq!(state.time_until_next_request(DELAY, now), None);

        state.record_request(now);
        assert_eq!(state.last_request_time, Some(now));
        assert_eq!(
            state.time_until_next_request(DELAY, now),
            Some(DELAY)
        );
        assert_eq!(
            state.time_until_next_request(DELAY, now + Duration::from_millis(300)),
            Some(Duration::from_millis(700))
        );
        assert_eq!(
            state.time_until_next_request(DELAY, now + Duration::from_secs(1)),
            None
        );
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut state = DomainState::new(1);
        let now = Instant::now();
        state.record_request(now);
        assert_eq!(state.time_until_next_request(Duration::ZERO, now), None);
    }
}
