// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` assembles the full gateway over a chosen storage backend
//! and a pinned clock, and drives requests through the router with
//! `oneshot`, so no socket is bound.

use std::sync::{Arc, Mutex};

use agegap_config::model::{AgegapConfig, StorageConfig};
use agegap_core::{AgegapError, StorageAdapter};
use agegap_game::{DailyChallenge, PersonDataset};
use agegap_gateway::{AppState, router};
use agegap_storage::SqliteStorage;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{DateTime, NaiveDate, Utc};
use tower::ServiceExt;

use crate::fixtures::{TEST_SECRET, golden_now};
use crate::memory::MemoryStorage;

/// Which storage backend the harness wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    /// SQLite in a temp directory.
    Sqlite,
    /// No persistence.
    Disabled,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    storage: StorageKind,
    config: AgegapConfig,
    now: DateTime<Utc>,
    dataset: Option<PersonDataset>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = AgegapConfig::default();
        config.game.secret = Some(TEST_SECRET.to_string());
        Self {
            storage: StorageKind::Memory,
            config,
            now: golden_now(),
            dataset: None,
        }
    }

    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_rate_limit(mut self, limit: u32, window_secs: u64) -> Self {
        self.config.rate_limit.limit = limit;
        self.config.rate_limit.window_secs = window_secs;
        self
    }

    /// Starting time; change it later with [`TestHarness::set_now`].
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Replaces the embedded dataset.
    pub fn with_dataset(mut self, dataset: PersonDataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Arbitrary config tweaks applied before the state is built.
    pub fn with_config(mut self, edit: impl FnOnce(&mut AgegapConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub async fn build(self) -> Result<TestHarness, AgegapError> {
        let dataset = match self.dataset {
            Some(dataset) => dataset,
            None => PersonDataset::embedded()?,
        };

        let mut temp_dir = None;
        let mut memory = None;
        let storage: Option<Arc<dyn StorageAdapter>> = match self.storage {
            StorageKind::Disabled => None,
            StorageKind::Memory => {
                let store = Arc::new(MemoryStorage::new());
                memory = Some(store.clone());
                let store: Arc<dyn StorageAdapter> = store;
                Some(store)
            }
            StorageKind::Sqlite => {
                let dir = tempfile::TempDir::new().map_err(AgegapError::storage)?;
                let path = dir.path().join("agegap-test.db");
                let sqlite = SqliteStorage::new(StorageConfig {
                    enabled: true,
                    database_path: path.to_string_lossy().to_string(),
                    wal_mode: true,
                });
                sqlite.initialize().await?;
                temp_dir = Some(dir);
                let sqlite: Arc<dyn StorageAdapter> = Arc::new(sqlite);
                Some(sqlite)
            }
        };

        let now = Arc::new(Mutex::new(self.now));
        let clock_now = now.clone();
        let state = AppState::from_config(&self.config, Arc::new(dataset), storage.clone())?
            .with_clock(Arc::new(move || match clock_now.lock() {
                Ok(guard) => *guard,
                Err(poisoned) => *poisoned.into_inner(),
            }));

        Ok(TestHarness {
            router: router(state.clone()),
            state,
            storage,
            memory,
            config: self.config,
            now,
            _temp_dir: temp_dir,
        })
    }
}

/// A buffered HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parses the body as JSON. Panics on invalid JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A complete gateway over test storage.
pub struct TestHarness {
    pub state: AppState,
    /// The storage handed to the gateway, if any.
    pub storage: Option<Arc<dyn StorageAdapter>>,
    /// Set when built with [`StorageKind::Memory`].
    pub memory: Option<Arc<MemoryStorage>>,
    pub config: AgegapConfig,
    router: Router,
    now: Arc<Mutex<DateTime<Utc>>>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with memory storage and default settings.
    pub async fn new() -> Result<Self, AgegapError> {
        Self::builder().build().await
    }

    /// Moves the pinned clock.
    pub fn set_now(&self, now: DateTime<Utc>) {
        match self.now.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// The challenge the server regenerates for `date`, answers included.
    pub fn challenge_for(&self, date: NaiveDate) -> DailyChallenge {
        DailyChallenge::for_date(
            &self.state.dataset,
            date,
            self.state.settings.matchups_per_day,
        )
    }

    /// Correct answers for `date`, in matchup order.
    pub fn answers_for(&self, date: NaiveDate) -> Vec<String> {
        self.challenge_for(date).older_ids()
    }

    /// A valid signature for `date`.
    pub fn sig_for(&self, date: NaiveDate) -> String {
        self.challenge_for(date)
            .sign(&self.state.signer)
            .unwrap_or_else(|e| panic!("signing failed: {e}"))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(build(builder, Body::empty())).await
    }

    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> TestResponse {
        self.post_json_with_headers(uri, body, &[]).await
    }

    pub async fn post_json_with_headers(
        &self,
        uri: &str,
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(build(builder, Body::from(body.to_string()))).await
    }

    /// POST with an explicit content type and raw body.
    pub async fn post_raw(&self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        self.send(build(builder, Body::from(body.to_string()))).await
    }
}

fn build(builder: axum::http::request::Builder, body: Body) -> Request<Body> {
    builder
        .body(body)
        .unwrap_or_else(|e| panic!("invalid test request: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_serves_health() {
        let harness = TestHarness::new().await.unwrap();
        let resp = harness.get("/health").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.json()["storage"], "healthy");
    }

    #[tokio::test]
    async fn clock_can_be_moved() {
        let harness = TestHarness::new().await.unwrap();
        assert_eq!(harness.state.today(), crate::fixtures::golden_date());
        let later = golden_now() + chrono::Duration::days(1);
        harness.set_now(later);
        assert_eq!(harness.state.today(), later.date_naive());
    }

    #[tokio::test]
    async fn sqlite_backend_builds() {
        let harness = TestHarness::builder()
            .with_storage(StorageKind::Sqlite)
            .build()
            .await
            .unwrap();
        assert!(harness.storage.is_some());
        assert!(harness.memory.is_none());
    }
}
