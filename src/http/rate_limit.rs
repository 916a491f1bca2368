//! Client-side request throttling
//!
//! The hub enforces per-account request quotas. A token bucket from the
//! governor crate keeps a client under a chosen rate instead of running into
//! `429` responses, which are not retried.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Throttle configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests allowed per `period`
    pub requests: u32,
    /// Window the request count applies to
    #[serde(with = "period_secs")]
    pub period: Duration,
    /// Requests that may be sent back to back
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// `requests` per second, bursting up to the same amount
    pub fn per_second(requests: u32) -> Self {
        Self {
            requests,
            period: Duration::from_secs(1),
            burst_size: requests,
        }
    }

    /// `requests` per minute, bursting up to the same amount
    pub fn per_minute(requests: u32) -> Self {
        Self {
            requests,
            period: Duration::from_secs(60),
            burst_size: requests,
        }
    }

    /// Override the burst size
    #[must_use]
    pub fn burst(mut self, burst_size: u32) -> Self {
        self.burst_size = burst_size;
        self
    }

    fn quota(&self) -> Quota {
        let requests = self.requests.max(1);
        let replenish = self.period / requests;
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

mod period_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(period: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(period.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Shared token bucket
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a throttle for the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request may be sent
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
