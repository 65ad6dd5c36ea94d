// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use agegap_config::model::StorageConfig;
use agegap_core::{
    AgegapError, HealthStatus, PlayOutcome, PluginAdapter, StorageAdapter, StreakRecord,
    Subscription, timestamp_now,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Opening is deferred to [`StorageAdapter::initialize`], which also runs
/// migrations.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, AgegapError> {
        self.db.get().ok_or_else(|| AgegapError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, AgegapError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        match db.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), AgegapError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), AgegapError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AgegapError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AgegapError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn increment_window(
        &self,
        client_id: &str,
        window_start: i64,
    ) -> Result<u32, AgegapError> {
        queries::rate_limits::increment_window(self.db()?, client_id, window_start).await
    }

    async fn get_streak(&self, client_id: &str) -> Result<Option<StreakRecord>, AgegapError> {
        queries::streaks::get_streak(self.db()?, client_id).await
    }

    async fn record_play(
        &self,
        client_id: &str,
        date: NaiveDate,
        perfect: bool,
    ) -> Result<PlayOutcome, AgegapError> {
        queries::streaks::record_play(self.db()?, client_id, date, perfect, timestamp_now()).await
    }

    async fn insert_subscription(&self, subscription: &Subscription) -> Result<bool, AgegapError> {
        queries::subscriptions::insert_subscription(self.db()?, subscription).await
    }
}
