// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for tests.
//!
//! `MemoryStorage` follows the same replay and window rules as the SQLite
//! backend. Every call holds a single lock for its whole read-modify-write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use agegap_core::{
    AgegapError, HealthStatus, PlayOutcome, PluginAdapter, StorageAdapter, StreakRecord,
    StreakSummary, Subscription, streak, timestamp_now,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    windows: HashMap<String, (i64, u32)>,
    streaks: HashMap<String, StreakRecord>,
    subscriptions: HashMap<String, Subscription>,
}

/// Map-backed `StorageAdapter`.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every call fails until `set_failing(false)`.
    pub fn failing() -> Self {
        let storage = Self::default();
        storage.set_failing(true);
        storage
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Inserts or replaces a streak row directly.
    pub async fn seed_streak(&self, record: StreakRecord) {
        self.state
            .lock()
            .await
            .streaks
            .insert(record.client_id.clone(), record);
    }

    /// Stored subscriptions, in no particular order.
    pub async fn subscriptions(&self) -> Vec<Subscription> {
        self.state
            .lock()
            .await
            .subscriptions
            .values()
            .cloned()
            .collect()
    }

    /// Current `(window_start, count)` for a client.
    pub async fn window(&self, client_id: &str) -> Option<(i64, u32)> {
        self.state.lock().await.windows.get(client_id).copied()
    }

    fn check(&self) -> Result<(), AgegapError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AgegapError::storage(std::io::Error::other(
                "memory storage set to fail",
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, AgegapError> {
        if self.failing.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("set to fail".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AgegapError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), AgegapError> {
        self.check()
    }

    async fn close(&self) -> Result<(), AgegapError> {
        Ok(())
    }

    async fn increment_window(
        &self,
        client_id: &str,
        window_start: i64,
    ) -> Result<u32, AgegapError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let entry = state
            .windows
            .entry(client_id.to_string())
            .or_insert((window_start, 0));
        if entry.0 != window_start {
            *entry = (window_start, 0);
        }
        entry.1 += 1;
        Ok(entry.1)
    }

    async fn get_streak(&self, client_id: &str) -> Result<Option<StreakRecord>, AgegapError> {
        self.check()?;
        Ok(self.state.lock().await.streaks.get(client_id).cloned())
    }

    async fn record_play(
        &self,
        client_id: &str,
        date: NaiveDate,
        perfect: bool,
    ) -> Result<PlayOutcome, AgegapError> {
        self.check()?;
        let mut state = self.state.lock().await;
        let prior = state.streaks.get(client_id);
        if prior.is_some_and(|p| p.last_played_date == date) {
            return Ok(PlayOutcome::AlreadyPlayed);
        }
        let next = streak::advance(prior, client_id, date, perfect, timestamp_now());
        let summary = StreakSummary::from(&next);
        state.streaks.insert(client_id.to_string(), next);
        Ok(PlayOutcome::Recorded(summary))
    }

    async fn insert_subscription(&self, subscription: &Subscription) -> Result<bool, AgegapError> {
        self.check()?;
        let mut state = self.state.lock().await;
        if state.subscriptions.contains_key(&subscription.email_hash) {
            return Ok(false);
        }
        state
            .subscriptions
            .insert(subscription.email_hash.clone(), subscription.clone());
        Ok(true)
    }
}
