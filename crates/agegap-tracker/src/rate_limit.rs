// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window rate limiting.
//!
//! The window index is `floor(now / window_secs)`. Every check counts,
//! including denied ones. A request is denied once the window's count
//! exceeds the limit, with a retry hint pointing at the next boundary.
//!
//! The limiter is a courtesy throttle. Without storage, or when storage
//! fails, requests are allowed.

use std::sync::Arc;

use agegap_config::model::RateLimitConfig;
use agegap_core::{ClientId, StorageAdapter};
use tracing::{debug, warn};

/// Result of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Seconds until the next window, set only when denied.
    pub retry_after_secs: Option<u64>,
}

impl RateDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            retry_after_secs: None,
        }
    }

    pub fn deny(retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            retry_after_secs: Some(retry_after_secs),
        }
    }
}

/// Per-client fixed-window limiter.
#[derive(Clone)]
pub struct RateLimiter {
    storage: Option<Arc<dyn StorageAdapter>>,
    limit: u32,
    /// Window length in seconds, always in `1..=i64::MAX`.
    window_secs: i64,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig, storage: Option<Arc<dyn StorageAdapter>>) -> Self {
        Self {
            storage,
            limit: config.limit,
            window_secs: i64::try_from(config.window_secs).unwrap_or(i64::MAX).max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs.unsigned_abs()
    }

    /// Window containing `now_secs`.
    pub fn window_index(&self, now_secs: i64) -> i64 {
        now_secs.div_euclid(self.window_secs)
    }

    /// Seconds from `now_secs` to the start of the next window, at least 1.
    pub fn retry_after(&self, now_secs: i64) -> u64 {
        let offset = now_secs.rem_euclid(self.window_secs);
        (self.window_secs - offset).max(1).unsigned_abs()
    }

    /// Counts this request and decides whether it may proceed.
    pub async fn check(&self, client: &ClientId, now_secs: i64) -> RateDecision {
        let Some(storage) = &self.storage else {
            return RateDecision::allow();
        };

        let window = self.window_index(now_secs);
        match storage.increment_window(client.as_str(), window).await {
            Ok(count) if count > self.limit => {
                let retry = self.retry_after(now_secs);
                debug!(client_id = %client, count, limit = self.limit, retry_after = retry, "rate limited");
                RateDecision::deny(retry)
            }
            Ok(_) => RateDecision::allow(),
            Err(e) => {
                warn!(client_id = %client, error = %e, "rate limit storage failed, allowing request");
                RateDecision::allow()
            }
        }
    }
}
