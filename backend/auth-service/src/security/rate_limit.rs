/// Sliding-window request rate limiting
///
/// Best-effort and process-local: each instance counts independently, so a
/// deployment behind multiple replicas needs a shared counter store instead.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::Duration;
use serde::Deserialize;

use crate::clock::Clock;

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_seconds: 60,
        }
    }
}

pub struct RateLimiter {
    /// client key -> request timestamps (Unix millis) inside the window
    buckets: Mutex<HashMap<String, VecDeque<i64>>>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// Prune the key's bucket to the trailing window, then admit the request
    /// if the count is below the limit. Admitted requests are recorded.
    pub fn allow(&self, client_key: &str) -> bool {
        let now = self.clock.now().timestamp_millis();
        let window_millis = Duration::seconds(self.config.window_seconds).num_milliseconds();

        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets.entry(client_key.to_string()).or_default();

        while bucket.front().is_some_and(|t| now - *t >= window_millis) {
            bucket.pop_front();
        }

        if bucket.len() >= self.config.max_requests as usize {
            return false;
        }

        bucket.push_back(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Utc;

    fn limiter(max_requests: u32, clock: Arc<ManualClock>) -> RateLimiter {
        RateLimiter::new(
            RateLimitConfig {
                max_requests,
                window_seconds: 60,
            },
            clock,
        )
    }

    #[test]
    fn test_limit_boundary() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = limiter(3, clock.clone());

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = limiter(1, clock.clone());

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn test_window_slides_capacity_back() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = limiter(2, clock.clone());

        assert!(limiter.allow("10.0.0.1"));
        clock.advance(Duration::seconds(30));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));

        // First request falls out of the 60s window; one slot frees up.
        clock.advance(Duration::seconds(31));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_rejected_request_not_counted() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = limiter(1, clock.clone());

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::seconds(61));
        // Only the admitted request occupied the window.
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window_seconds, 60);
    }
}
