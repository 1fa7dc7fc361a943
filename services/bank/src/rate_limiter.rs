//! Login rate limiter for preventing brute force attacks
//!
//! Tracks attempts per normalized email in process memory. A key that
//! exceeds the attempt budget within the window is banned until the ban
//! expires.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed inside the window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

#[derive(Debug)]
struct AttemptRecord {
    attempts: u32,
    last_attempt: Instant,
    ban_expires: Option<Instant>,
}

/// Per-key sliding-window rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    records: Arc<Mutex<HashMap<String, AttemptRecord>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for the key and report whether it is allowed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut records = self.records.lock().await;
        let now = Instant::now();

        let record = records.entry(key.to_string()).or_insert(AttemptRecord {
            attempts: 0,
            last_attempt: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = record.ban_expires {
            if now >= ban_expires {
                record.attempts = 0;
                record.ban_expires = None;
            } else {
                return false;
            }
        }

        if now.duration_since(record.last_attempt)
            >= Duration::from_secs(self.config.window_seconds)
        {
            record.attempts = 0;
        }

        if record.attempts >= self.config.max_attempts {
            record.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Banned login key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        record.attempts += 1;
        record.last_attempt = now;

        true
    }

    /// Forget a key after a successful attempt
    pub async fn reset(&self, key: &str) {
        let mut records = self.records.lock().await;
        records.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        })
    }

    #[tokio::test]
    async fn allows_up_to_the_attempt_budget() {
        let limiter = limiter(3);
        for _ in 0..3 {
            assert!(limiter.is_allowed("user@example.com").await);
        }
        assert!(!limiter.is_allowed("user@example.com").await);
    }

    #[tokio::test]
    async fn bans_persist_across_calls() {
        let limiter = limiter(1);
        assert!(limiter.is_allowed("user@example.com").await);
        assert!(!limiter.is_allowed("user@example.com").await);
        assert!(!limiter.is_allowed("user@example.com").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = limiter(1);
        assert!(limiter.is_allowed("a@example.com").await);
        assert!(limiter.is_allowed("b@example.com").await);
    }

    #[tokio::test]
    async fn reset_clears_the_counter() {
        let limiter = limiter(2);
        assert!(limiter.is_allowed("user@example.com").await);
        assert!(limiter.is_allowed("user@example.com").await);
        limiter.reset("user@example.com").await;
        assert!(limiter.is_allowed("user@example.com").await);
    }
}
