// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the agegap service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Signing secret used when none is configured. Only suitable for local play.
pub const DEV_SECRET: &str = "dev-secret";

/// Top-level agegap configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgegapConfig {
    /// HTTP listener and response settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Challenge generation and signing settings.
    #[serde(default)]
    pub game: GameConfig,

    /// Per-client request throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Email capture settings.
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `max-age` for the daily challenge response.
    #[serde(default = "default_challenge_max_age_secs")]
    pub challenge_max_age_secs: u64,

    /// Header carrying the originating client address (set by the edge proxy).
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            challenge_max_age_secs: default_challenge_max_age_secs(),
            client_ip_header: default_client_ip_header(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_challenge_max_age_secs() -> u64 {
    300
}

fn default_client_ip_header() -> String {
    "cf-connecting-ip".to_string()
}

/// Challenge generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Secret keying challenge signatures and client fingerprints.
    /// `None` falls back to [`DEV_SECRET`].
    #[serde(default)]
    pub secret: Option<String>,

    /// Number of matchups in each daily challenge.
    #[serde(default = "default_matchups_per_day")]
    pub matchups_per_day: usize,

    /// Path to a person dataset JSON file. `None` uses the embedded dataset.
    #[serde(default)]
    pub dataset_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            secret: None,
            matchups_per_day: default_matchups_per_day(),
            dataset_path: None,
        }
    }
}

impl GameConfig {
    /// The configured secret, or the development fallback.
    pub fn effective_secret(&self) -> &str {
        self.secret.as_deref().unwrap_or(DEV_SECRET)
    }

    /// True when no secret was configured.
    pub fn uses_dev_secret(&self) -> bool {
        self.secret.is_none()
    }
}

fn default_matchups_per_day() -> usize {
    10
}

/// Fixed-window rate limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_limit() -> u32 {
    20
}

fn default_window_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// When false the service runs without persistence: rate limiting
    /// allows everything and streaks are not tracked.
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_storage_enabled() -> bool {
    true
}

fn default_database_path() -> String {
    "agegap.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Email capture configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionConfig {
    /// Salt for hashing addresses. Falls back to the game secret.
    #[serde(default)]
    pub salt: Option<String>,
}

impl AgegapConfig {
    /// Secret used to hash subscription emails.
    pub fn subscription_secret(&self) -> &str {
        self.subscription
            .salt
            .as_deref()
            .unwrap_or_else(|| self.game.effective_secret())
    }
}
