// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the game API.

use std::future::Future;
use std::sync::Arc;

use agegap_config::model::{AgegapConfig, ServerConfig};
use agegap_core::{AgegapError, StorageAdapter};
use agegap_game::PersonDataset;
use agegap_security::ChallengeSigner;
use agegap_tracker::{RateLimiter, StreakTracker};
use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Source of the current time. Swapped out in tests to pin "today".
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Request-independent settings copied out of the loaded config.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub matchups_per_day: usize,
    /// `max-age` / `s-maxage` for the daily challenge.
    pub challenge_max_age_secs: u64,
    /// Header carrying the originating address behind a proxy.
    pub client_ip_header: String,
}

impl From<&AgegapConfig> for GatewaySettings {
    fn from(config: &AgegapConfig) -> Self {
        Self {
            matchups_per_day: config.game.matchups_per_day,
            challenge_max_age_secs: config.server.challenge_max_age_secs,
            client_ip_header: config.server.client_ip_header.clone(),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<PersonDataset>,
    /// Signs challenges and fingerprints anonymous clients.
    pub signer: Arc<ChallengeSigner>,
    /// Keys email hashes; may use a separate salt.
    pub email_signer: Arc<ChallengeSigner>,
    pub rate_limiter: RateLimiter,
    pub streaks: StreakTracker,
    /// `None` when running without persistence.
    pub storage: Option<Arc<dyn StorageAdapter>>,
    pub settings: GatewaySettings,
    clock: Clock,
}

impl AppState {
    /// Builds the state from config, a loaded dataset, and optional storage.
    pub fn from_config(
        config: &AgegapConfig,
        dataset: Arc<PersonDataset>,
        storage: Option<Arc<dyn StorageAdapter>>,
    ) -> Result<Self, AgegapError> {
        let signer = Arc::new(ChallengeSigner::new(config.game.effective_secret())?);
        let email_signer = Arc::new(ChallengeSigner::new(config.subscription_secret())?);

        Ok(Self {
            dataset,
            signer,
            email_signer,
            rate_limiter: RateLimiter::new(&config.rate_limit, storage.clone()),
            streaks: StreakTracker::new(storage.clone()),
            storage,
            settings: GatewaySettings::from(config),
            clock: Arc::new(Utc::now),
        })
    }

    /// Replaces the wall clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Today's date in UTC.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Builds the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/today", get(handlers::get_today))
        .route("/api/score", post(handlers::post_score))
        .route("/api/streak", get(handlers::get_streak))
        .route("/api/subscribe", post(handlers::post_subscribe))
        .route("/api/error", post(handlers::post_error))
        .route("/api/image/{id}", get(handlers::get_image))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves.
///
/// In-flight requests are drained before returning.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), AgegapError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgegapError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("agegap listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AgegapError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state() -> AppState {
        let dataset = Arc::new(PersonDataset::embedded().unwrap());
        AppState::from_config(&AgegapConfig::default(), dataset, None).unwrap()
    }

    #[test]
    fn app_state_is_clone() {
        let _cloned = state().clone();
    }

    #[test]
    fn settings_follow_config() {
        let s = state().settings;
        assert_eq!(s.matchups_per_day, 10);
        assert_eq!(s.challenge_max_age_secs, 300);
        assert_eq!(s.client_ip_header, "cf-connecting-ip");
    }

    #[test]
    fn clock_override_sets_today() {
        let fixed = Utc.with_ymd_and_hms(2025, 11, 20, 23, 59, 0).unwrap();
        let state = state().with_clock(Arc::new(move || fixed));
        assert_eq!(state.today(), NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
    }

    #[test]
    fn streaks_disabled_without_storage() {
        assert!(!state().streaks.is_enabled());
    }

    #[tokio::test]
    async fn router_serves_health() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let response = router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let missing = router(state())
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
