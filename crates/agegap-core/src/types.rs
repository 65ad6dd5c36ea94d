// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the generator, storage, and gateway crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Calendar date format used on the wire and in storage (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pseudonymous key scoping streaks and rate limits to one browser or device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate public figure from the static dataset.
///
/// `sitelinks` is the popularity score carried over from the dataset
/// collection step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(with = "birth_date")]
    pub birth_date: NaiveDate,
    pub birth_year: i32,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub sitelinks: u32,
}

/// Serde adapter for birth dates.
///
/// Accepts plain `YYYY-MM-DD` or a full RFC 3339 timestamp (the shape the
/// dataset collector emits) and always writes `YYYY-MM-DD`.
mod birth_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.date_naive())
            .map_err(|e| serde::de::Error::custom(format!("invalid birthDate `{raw}`: {e}")))
    }
}

/// Difficulty label attached to a matchup, derived from the birth-year gap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Two people presented together with the id of the older one.
///
/// Matchups are recomputed per request from the date and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub person_a: Person,
    pub person_b: Person,
    pub older_id: String,
    pub difficulty: Difficulty,
    pub age_gap_years: u32,
}

/// Persisted per-client streak state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakRecord {
    pub client_id: String,
    pub last_played_date: NaiveDate,
    pub current_streak: u32,
    pub best_streak: u32,
    /// ISO 8601 timestamp of the last write.
    pub updated_at: String,
}

/// Streak view returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub streak: u32,
    pub best: u32,
    #[serde(with = "optional_date")]
    pub last_date: Option<NaiveDate>,
}

impl StreakSummary {
    /// The summary for a client with no scored plays.
    pub fn empty() -> Self {
        Self {
            streak: 0,
            best: 0,
            last_date: None,
        }
    }
}

impl From<&StreakRecord> for StreakSummary {
    fn from(record: &StreakRecord) -> Self {
        Self {
            streak: record.current_streak,
            best: record.best_streak,
            last_date: Some(record.last_played_date),
        }
    }
}

mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Result of recording a scored play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The play was recorded and the streak advanced.
    Recorded(StreakSummary),
    /// The client already has a scored play for this date; nothing was written.
    AlreadyPlayed,
}

/// Persisted fixed-window request counter for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub client_id: String,
    /// Window index: `floor(epoch_seconds / window_seconds)`.
    pub window_start: i64,
    pub count: u32,
}

/// An email capture entry. The raw address is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Hex HMAC of the normalized address.
    pub email_hash: String,
    /// Truncated display hint, e.g. `jo***@example.com`.
    pub email_hint: String,
    pub created_at: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
