// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agegap challenge` command implementation.

use std::path::Path;

use agegap_config::model::AgegapConfig;
use agegap_core::AgegapError;
use agegap_core::types::DATE_FORMAT;
use agegap_game::{DailyChallenge, PersonDataset};
use agegap_security::ChallengeSigner;
use chrono::{NaiveDate, Utc};

/// Prints the signed challenge for `date` (UTC today by default).
pub fn run_challenge(
    config: &AgegapConfig,
    date: Option<&str>,
    include_answers: bool,
) -> Result<(), AgegapError> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|e| AgegapError::Config(format!("invalid --date `{raw}`: {e}")))?,
        None => Utc::now().date_naive(),
    };
    let dataset = PersonDataset::load(config.game.dataset_path.as_deref().map(Path::new))?;
    let json = challenge_json(config, &dataset, date, include_answers)?;
    let rendered = serde_json::to_string_pretty(&json)
        .map_err(|e| AgegapError::Internal(format!("failed to render challenge: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// The public challenge body, plus an `answers` array when requested.
pub fn challenge_json(
    config: &AgegapConfig,
    dataset: &PersonDataset,
    date: NaiveDate,
    include_answers: bool,
) -> Result<serde_json::Value, AgegapError> {
    let signer = ChallengeSigner::new(config.game.effective_secret())?;
    let challenge = DailyChallenge::for_date(dataset, date, config.game.matchups_per_day);
    let sig = challenge.sign(&signer)?;
    let answers = challenge.older_ids();

    let mut json = serde_json::to_value(challenge.to_public(sig))
        .map_err(|e| AgegapError::Internal(format!("failed to encode challenge: {e}")))?;
    if include_answers {
        if let Some(obj) = json.as_object_mut() {
            obj.insert("answers".to_string(), serde_json::Value::from(answers));
        }
    }
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    fn config() -> AgegapConfig {
        let mut config = AgegapConfig::default();
        config.game.secret = Some("test-secret".to_string());
        config
    }

    #[test]
    fn answers_only_when_requested() {
        let dataset = PersonDataset::embedded().unwrap();
        let hidden = challenge_json(&config(), &dataset, golden(), false).unwrap();
        assert!(hidden.get("answers").is_none());

        let shown = challenge_json(&config(), &dataset, golden(), true).unwrap();
        let answers = shown["answers"].as_array().unwrap();
        assert_eq!(answers.len(), 10);
        assert_eq!(answers[0], "Q10132");
    }

    #[test]
    fn signature_matches_server_signing() {
        let dataset = PersonDataset::embedded().unwrap();
        let json = challenge_json(&config(), &dataset, golden(), false).unwrap();
        let signer = ChallengeSigner::new("test-secret").unwrap();
        let challenge = DailyChallenge::for_date(&dataset, golden(), 10);
        assert!(challenge.verify(&signer, json["sig"].as_str().unwrap()));
    }
}
