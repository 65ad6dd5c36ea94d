// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Score submission pipeline.
//!
//! Checks run in a fixed order and the first failure ends the request:
//! signature, answer count, rate limit, replay. Only the rate limiter
//! writes before scoring, since counting is part of its check.

use agegap_core::{ClientId, PlayOutcome, StreakSummary};
use agegap_game::{DailyChallenge, Scorecard, score_answers};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::server::AppState;

/// A validated score submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub date: NaiveDate,
    pub answers: Vec<String>,
    pub sig: String,
}

/// Scorecard plus the updated streak, when storage is enabled.
#[derive(Debug, Clone)]
pub struct ScoredPlay {
    pub scorecard: Scorecard,
    pub streak: Option<StreakSummary>,
}

/// Runs a submission through every check, scores it, and records the play.
///
/// `client` is resolved lazily so rejected forgeries never touch the
/// fingerprint path.
pub async fn score_submission<F>(
    state: &AppState,
    submission: Submission,
    resolve_client: F,
) -> Result<ScoredPlay, ApiError>
where
    F: FnOnce() -> ClientId,
{
    let challenge = DailyChallenge::for_date(
        &state.dataset,
        submission.date,
        state.settings.matchups_per_day,
    );

    if !challenge.verify(&state.signer, &submission.sig) {
        warn!(date = %submission.date, "score rejected: signature mismatch");
        return Err(ApiError::Authenticity);
    }

    if submission.answers.len() != challenge.matchups.len() {
        return Err(ApiError::Validation("Answers are incomplete".to_string()));
    }

    let client = resolve_client();

    let decision = state
        .rate_limiter
        .check(&client, state.now().timestamp())
        .await;
    if !decision.allowed {
        return Err(ApiError::Throttled {
            retry_after_secs: decision.retry_after_secs.unwrap_or(1),
        });
    }

    if state.streaks.last_played(&client).await? == Some(submission.date) {
        return Err(ApiError::AlreadyPlayed);
    }

    let scorecard = score_answers(&challenge.matchups, &submission.answers);
    info!(
        client_id = %client,
        date = %submission.date,
        score = scorecard.score,
        total = scorecard.total,
        "score submitted"
    );

    let streak = match state
        .streaks
        .record(&client, submission.date, scorecard.is_perfect())
        .await?
    {
        Some(PlayOutcome::Recorded(summary)) => Some(summary),
        // Lost a race with a concurrent submission for the same date.
        Some(PlayOutcome::AlreadyPlayed) => return Err(ApiError::AlreadyPlayed),
        None => None,
    };

    Ok(ScoredPlay { scorecard, streak })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agegap_config::model::AgegapConfig;
    use agegap_game::PersonDataset;
    use chrono::TimeZone;

    use super::*;

    fn state() -> AppState {
        let mut config = AgegapConfig::default();
        config.game.secret = Some("test-secret".to_string());
        let dataset = Arc::new(PersonDataset::embedded().unwrap());
        let now = chrono::Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap();
        AppState::from_config(&config, dataset, None)
            .unwrap()
            .with_clock(Arc::new(move || now))
    }

    fn submission(state: &AppState, answers: Vec<String>, sig: Option<String>) -> Submission {
        let date = state.today();
        let challenge = DailyChallenge::for_date(&state.dataset, date, 10);
        Submission {
            date,
            answers,
            sig: sig.unwrap_or_else(|| challenge.sign(&state.signer).unwrap()),
        }
    }

    fn answers(state: &AppState) -> Vec<String> {
        DailyChallenge::for_date(&state.dataset, state.today(), 10).older_ids()
    }

    #[tokio::test]
    async fn forged_signature_never_resolves_client() {
        let state = state();
        let sub = submission(&state, answers(&state), Some("AAAAAAAAAAAA".to_string()));
        let result = score_submission(&state, sub, || panic!("client resolved")).await;
        assert!(matches!(result, Err(ApiError::Authenticity)));
    }

    #[tokio::test]
    async fn short_answer_list_is_rejected_after_signature() {
        let state = state();
        let mut list = answers(&state);
        list.truncate(3);
        let sub = submission(&state, list, None);
        let result = score_submission(&state, sub, || panic!("client resolved")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn scores_without_storage() {
        let state = state();
        let sub = submission(&state, answers(&state), None);
        let played = score_submission(&state, sub, || ClientId("c".to_string()))
            .await
            .unwrap();
        assert!(played.scorecard.is_perfect());
        assert_eq!(played.scorecard.total, 10);
        assert!(played.streak.is_none());
    }
}
