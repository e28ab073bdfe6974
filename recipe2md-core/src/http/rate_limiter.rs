//! Per-host request spacing.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Keeps requests to the same host at least `min_delay` apart.
///
/// A single `view` or `save` makes one or two requests, but `list` can hit
/// the same recipe site dozens of times in a row.
pub struct RateLimiter {
    min_delay: Duration,
    last_request: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: DashMap::new(),
        }
    }

    /// Sleep until `host` may be contacted again, then record the request.
    pub async fn wait(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        let pending = self
            .last_request
            .get(host)
            .map(|last| self.min_delay.saturating_sub(last.elapsed()));
        if let Some(wait_time) = pending.filter(|d| !d.is_zero()) {
            tracing::debug!(host, wait_ms = wait_time.as_millis() as u64, "rate limiting");
            sleep(wait_time).await;
        }

        self.last_request.insert(host.to_string(), Instant::now());
    }

    pub fn tracked_hosts(&self) -> usize {
        self.last_request.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_delay_tracks_nothing() {
        let limiter = RateLimiter::new(Duration::ZERO);
        limiter.wait("example.com").await;
        assert_eq!(limiter.tracked_hosts(), 0);
    }

    #[tokio::test]
    async fn test_second_request_to_same_host_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.wait("example.com").await;
        limiter.wait("example.com").await;
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(limiter.tracked_hosts(), 1);
    }

    #[tokio::test]
    async fn test_hosts_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.wait("a.example").await;
        limiter.wait("b.example").await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.tracked_hosts(), 2);
    }
}
