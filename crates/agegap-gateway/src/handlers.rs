// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the game API.
//!
//! Handles GET /api/today, POST /api/score, GET /api/streak,
//! POST /api/subscribe, POST /api/error, GET /api/image/{id} and GET /health.

use std::sync::LazyLock;

use agegap_core::types::DATE_FORMAT;
use agegap_core::{AgegapError, HealthStatus, StreakSummary, Subscription, timestamp_now};
use agegap_game::{DailyChallenge, PublicChallenge, Scorecard};
use agegap_security::{derive_client_id, email_hint, hash_email, is_plausible_email};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::request_metadata;
use crate::error::ApiError;
use crate::flow::{Submission, score_submission};
use crate::server::AppState;

static DATE_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());

static PERSON_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^Q[0-9]+$").ok());

const MIN_SIG_LEN: usize = 8;

/// Browser cache for image redirects: one day, one week at the edge.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400, s-maxage=604800";

/// Request body for POST /api/score.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub date: String,
    /// Chosen person ids, one per matchup in issue order.
    pub answers: Vec<String>,
    pub sig: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl ScoreRequest {
    /// Checks field shapes and parses the date.
    pub fn validate(self) -> Result<(Submission, Option<String>), ApiError> {
        let date = parse_date(&self.date)?;
        if self.answers.is_empty() {
            return Err(ApiError::Validation("answers must not be empty".to_string()));
        }
        if self.sig.len() < MIN_SIG_LEN {
            return Err(ApiError::Validation("sig is too short".to_string()));
        }
        Ok((
            Submission {
                date,
                answers: self.answers,
                sig: self.sig,
            },
            self.client_id,
        ))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let shaped = DATE_SHAPE.as_ref().is_some_and(|re| re.is_match(raw));
    if !shaped {
        return Err(ApiError::Validation("date must be YYYY-MM-DD".to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ApiError::Validation(format!("invalid date `{raw}`")))
}

/// Response body for POST /api/score.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub scorecard: Scorecard,
    /// Absent when storage is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakSummary>,
}

/// Query string for GET /api/streak.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakQuery {
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Request body for POST /api/subscribe.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Response body for POST /api/subscribe.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub ok: bool,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Client-side error beacon.
#[derive(Debug, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    #[serde(default = "default_error_name")]
    pub name: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
}

fn default_error_name() -> String {
    "Error".to_string()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when storage is configured but unhealthy.
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// GET /api/today
///
/// Today's challenge without answers, signed.
pub async fn get_today(State(state): State<AppState>) -> Result<Response, ApiError> {
    let challenge = DailyChallenge::for_date(
        &state.dataset,
        state.today(),
        state.settings.matchups_per_day,
    );
    let sig = challenge.sign(&state.signer)?;
    let body: PublicChallenge = challenge.to_public(sig);

    let max_age = state.settings.challenge_max_age_secs;
    let cache_control = format!("public, max-age={max_age}, s-maxage={max_age}");
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}

/// POST /api/score
pub async fn post_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Json(request) = body?;
    let (submission, provided_id) = request.validate()?;

    let played = score_submission(&state, submission, || {
        let meta = request_metadata(&headers, &state.settings.client_ip_header);
        derive_client_id(&state.signer, &meta, provided_id.as_deref())
    })
    .await?;

    Ok(Json(ScoreResponse {
        scorecard: played.scorecard,
        streak: played.streak,
    }))
}

/// GET /api/streak
pub async fn get_streak(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<StreakQuery>, QueryRejection>,
) -> Result<Json<StreakSummary>, ApiError> {
    let Query(query) = query?;
    let meta = request_metadata(&headers, &state.settings.client_ip_header);
    let client = derive_client_id(&state.signer, &meta, query.client_id.as_deref());
    Ok(Json(state.streaks.summary(&client).await?))
}

/// POST /api/subscribe
///
/// Stores a keyed hash of the address. Without storage the request is
/// acknowledged with 202 and nothing is kept.
pub async fn post_subscribe(
    State(state): State<AppState>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    if !is_plausible_email(&request.email) {
        return Err(ApiError::Validation("Invalid email".to_string()));
    }

    let Some(storage) = &state.storage else {
        let body = SubscribeResponse {
            ok: true,
            stored: false,
            hint: None,
        };
        return Ok((StatusCode::ACCEPTED, Json(body)).into_response());
    };

    let hint = email_hint(&request.email);
    let subscription = Subscription {
        email_hash: hash_email(&state.email_signer, &request.email),
        email_hint: hint.clone(),
        created_at: timestamp_now(),
    };
    let inserted = storage.insert_subscription(&subscription).await?;
    tracing::info!(hint = %hint, new = inserted, "subscription captured");

    let body = SubscribeResponse {
        ok: true,
        stored: true,
        hint: Some(hint),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// POST /api/error
///
/// Beacons arrive as `text/plain`, so the body is parsed as JSON
/// regardless of content type.
pub async fn post_error(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let report: ErrorReport = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("invalid error report: {e}")))?;
    if report.message.is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }

    let meta = request_metadata(&headers, &state.settings.client_ip_header);
    let context = report
        .context
        .map(|c| serde_json::Value::Object(c).to_string());
    tracing::error!(
        name = %report.name,
        message = %report.message,
        stack = report.stack.as_deref().unwrap_or(""),
        context = context.as_deref().unwrap_or(""),
        user_agent = %meta.user_agent,
        ip = %meta.ip,
        "client error"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/image/{id}
///
/// Redirects to the person's portrait over https.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let valid = PERSON_ID.as_ref().is_some_and(|re| re.is_match(&id));
    if !valid {
        return Err(ApiError::Validation("invalid person id".to_string()));
    }
    let person = state
        .dataset
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("person not found".to_string()))?;

    let location = image_location(&person.image)?;
    let mut response = Redirect::to(&location).into_response();
    *response.status_mut() = StatusCode::FOUND;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_CACHE_CONTROL));
    Ok(response)
}

/// Forces https and asks Wikimedia file redirects for a 360px thumbnail.
pub fn image_location(raw: &str) -> Result<String, AgegapError> {
    let mut url =
        Url::parse(raw).map_err(|e| AgegapError::Dataset(format!("bad image url `{raw}`: {e}")))?;
    if url.scheme() == "http" {
        url.set_scheme("https")
            .map_err(|()| AgegapError::Dataset(format!("cannot upgrade `{raw}` to https")))?;
    }
    if url.path().contains("/Special:FilePath/") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "width")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("width", "360");
    }
    Ok(url.into())
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match &state.storage {
        None => "disabled".to_string(),
        Some(storage) => match storage.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(msg)) => format!("degraded: {msg}"),
            Ok(HealthStatus::Unhealthy(msg)) => format!("unhealthy: {msg}"),
            Err(e) => format!("unhealthy: {e}"),
        },
    };
    let status = if storage == "healthy" || storage == "disabled" {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    })
}
