// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the shared key-value/relational store.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AgegapError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{PlayOutcome, StreakRecord, Subscription};

/// Persistence for per-client streaks, rate-limit windows, and subscriptions.
///
/// Implementations must make [`increment_window`](Self::increment_window)
/// and [`record_play`](Self::record_play) atomic per client: concurrent
/// calls for the same client may not lose updates.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connections).
    async fn initialize(&self) -> Result<(), AgegapError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), AgegapError>;

    /// Counts one request for `client_id` in window `window_start`.
    ///
    /// If the stored window differs, the row is overwritten with a count of
    /// one. Returns the count after this request.
    async fn increment_window(
        &self,
        client_id: &str,
        window_start: i64,
    ) -> Result<u32, AgegapError>;

    /// Fetches the streak record for a client, if any.
    async fn get_streak(&self, client_id: &str) -> Result<Option<StreakRecord>, AgegapError>;

    /// Records a scored play and advances the streak.
    ///
    /// Returns [`PlayOutcome::AlreadyPlayed`] without writing when the stored
    /// last played date equals `date`. The check and the write happen in one
    /// transaction.
    async fn record_play(
        &self,
        client_id: &str,
        date: NaiveDate,
        perfect: bool,
    ) -> Result<PlayOutcome, AgegapError>;

    /// Stores a subscription. Returns `false` if the hash was already present.
    async fn insert_subscription(&self, subscription: &Subscription) -> Result<bool, AgegapError>;
}
