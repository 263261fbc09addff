//! Login attempt rate limiting.
//!
//! Attempts are counted per normalized identifier in a sliding window.
//! The check runs before credential verification, so a limited
//! identifier is rejected even when the submitted password is correct.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use bms_core::config::RateLimitConfig;

/// Decision returned by a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The attempt may proceed.
    Allowed,
    /// The attempt is rejected.
    Limited {
        /// Seconds until the oldest counted attempt leaves the window.
        retry_after_seconds: u64,
    },
}

impl ThrottleDecision {
    /// Returns `true` if the attempt was rejected.
    #[must_use]
    pub const fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }
}

/// Throttle for login attempts.
#[async_trait]
pub trait LoginThrottle: Send + Sync {
    /// Records an attempt for `key` and decides whether it may proceed.
    ///
    /// Rejected attempts are not counted, so hammering a limited
    /// identifier does not push the window further out.
    async fn acquire(&self, key: &str) -> ThrottleDecision;

    /// Drops tracking state that has left the window entirely.
    ///
    /// Returns how many keys were dropped.
    async fn remove_expired(&self) -> usize {
        0
    }
}

/// Throttle that never limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopThrottle;

#[async_trait]
impl LoginThrottle for NoopThrottle {
    async fn acquire(&self, _key: &str) -> ThrottleDecision {
        ThrottleDecision::Allowed
    }
}

/// Sliding-window throttle keyed by identifier.
pub struct SlidingWindowThrottle {
    max_attempts: usize,
    window: Duration,
    attempts: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl SlidingWindowThrottle {
    /// Creates a throttle allowing `max_attempts` per `window_seconds`.
    #[must_use]
    pub fn new(max_attempts: u32, window_seconds: i64) -> Self {
        Self {
            max_attempts: max_attempts as usize,
            window: Duration::seconds(window_seconds),
            attempts: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a throttle from the rate-limit configuration.
    #[must_use]
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_attempts, config.window_seconds)
    }
}

#[async_trait]
impl LoginThrottle for SlidingWindowThrottle {
    async fn acquire(&self, key: &str) -> ThrottleDecision {
        let now = Utc::now();
        let horizon = now - self.window;

        let mut attempts = self.attempts.write().await;
        let entry = attempts.entry(key.to_string()).or_default();
        entry.retain(|t| *t > horizon);

        if entry.len() >= self.max_attempts {
            let oldest = entry.first().copied().unwrap_or(now);
            let retry_after = (oldest + self.window - now).num_seconds().max(1) as u64;
            return ThrottleDecision::Limited {
                retry_after_seconds: retry_after,
            };
        }

        entry.push(now);
        ThrottleDecision::Allowed
    }

    async fn remove_expired(&self) -> usize {
        let horizon = Utc::now() - self.window;

        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, times| times.iter().any(|t| *t > horizon));
        before - attempts.len()
    }
}
