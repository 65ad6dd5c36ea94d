// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streak lookups and updates over optional storage.

use std::sync::Arc;

use agegap_core::{AgegapError, ClientId, PlayOutcome, StorageAdapter, StreakSummary};
use chrono::NaiveDate;
use tracing::info;

/// Reads and advances per-client streaks.
#[derive(Clone)]
pub struct StreakTracker {
    storage: Option<Arc<dyn StorageAdapter>>,
}

impl StreakTracker {
    pub fn new(storage: Option<Arc<dyn StorageAdapter>>) -> Self {
        Self { storage }
    }

    /// False when running without persistence.
    pub fn is_enabled(&self) -> bool {
        self.storage.is_some()
    }

    /// Current streak, or the empty summary for unknown clients and when
    /// storage is disabled.
    pub async fn summary(&self, client: &ClientId) -> Result<StreakSummary, AgegapError> {
        let Some(storage) = &self.storage else {
            return Ok(StreakSummary::empty());
        };
        Ok(storage
            .get_streak(client.as_str())
            .await?
            .map(|record| StreakSummary::from(&record))
            .unwrap_or_else(StreakSummary::empty))
    }

    /// Date of the client's last scored play.
    pub async fn last_played(&self, client: &ClientId) -> Result<Option<NaiveDate>, AgegapError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        Ok(storage
            .get_streak(client.as_str())
            .await?
            .map(|record| record.last_played_date))
    }

    /// Records a scored play. `None` means storage is disabled.
    pub async fn record(
        &self,
        client: &ClientId,
        date: NaiveDate,
        perfect: bool,
    ) -> Result<Option<PlayOutcome>, AgegapError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        let outcome = storage.record_play(client.as_str(), date, perfect).await?;
        if let PlayOutcome::Recorded(summary) = &outcome {
            info!(
                client_id = %client,
                %date,
                perfect,
                streak = summary.streak,
                best = summary.best,
                "streak updated"
            );
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegap_test_utils::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn client() -> ClientId {
        ClientId("c1".to_string())
    }

    #[tokio::test]
    async fn disabled_tracker_reports_nothing() {
        let tracker = StreakTracker::new(None);
        assert!(!tracker.is_enabled());
        assert_eq!(tracker.summary(&client()).await.unwrap(), StreakSummary::empty());
        assert_eq!(tracker.last_played(&client()).await.unwrap(), None);
        assert_eq!(tracker.record(&client(), day(1), true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn records_and_reports() {
        let tracker = StreakTracker::new(Some(Arc::new(MemoryStorage::new())));
        tracker.record(&client(), day(1), true).await.unwrap();
        let outcome = tracker.record(&client(), day(2), true).await.unwrap();
        assert_eq!(
            outcome,
            Some(PlayOutcome::Recorded(StreakSummary {
                streak: 2,
                best: 2,
                last_date: Some(day(2)),
            }))
        );
        assert_eq!(tracker.last_played(&client()).await.unwrap(), Some(day(2)));
        assert_eq!(tracker.summary(&client()).await.unwrap().streak, 2);
    }

    #[tokio::test]
    async fn replay_reported_as_already_played() {
        let tracker = StreakTracker::new(Some(Arc::new(MemoryStorage::new())));
        tracker.record(&client(), day(1), true).await.unwrap();
        assert_eq!(
            tracker.record(&client(), day(1), true).await.unwrap(),
            Some(PlayOutcome::AlreadyPlayed)
        );
        assert_eq!(tracker.summary(&client()).await.unwrap().streak, 1);
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let tracker = StreakTracker::new(Some(Arc::new(MemoryStorage::failing())));
        assert!(tracker.summary(&client()).await.is_err());
        assert!(tracker.record(&client(), day(1), true).await.is_err());
    }
}
