// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-client bookkeeping on top of an optional [`StorageAdapter`].
//!
//! Both trackers degrade when no storage is configured: the rate limiter
//! allows everything and the streak tracker reports no streak.
//!
//! [`StorageAdapter`]: agegap_core::StorageAdapter

pub mod rate_limit;
pub mod streak;

pub use rate_limit::{RateDecision, RateLimiter};
pub use streak::StreakTracker;
