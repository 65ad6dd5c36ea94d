// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the agegap daily trivia service.
//!
//! Holds the domain types shared by every other crate, the error type, the
//! consecutive-day streak state machine, and the storage adapter traits.

pub mod error;
pub mod streak;
pub mod traits;
pub mod types;

pub use error::AgegapError;
pub use types::{
    ClientId, Difficulty, HealthStatus, Matchup, Person, PlayOutcome, RateLimitRecord,
    StreakRecord, StreakSummary, Subscription,
};

pub use traits::{PluginAdapter, StorageAdapter};

/// Current UTC time as an ISO 8601 string with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
