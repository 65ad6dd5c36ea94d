// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A day's challenge and the answer-free form sent to clients.

use agegap_core::types::DATE_FORMAT;
use agegap_core::{AgegapError, Difficulty, Matchup, Person};
use agegap_security::{ChallengeSigner, SignedPayload};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::PersonDataset;
use crate::generator::generate;

/// The full challenge for one date, answers included. Never sent as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyChallenge {
    pub date: NaiveDate,
    pub matchups: Vec<Matchup>,
}

impl DailyChallenge {
    /// Regenerates the challenge for `date`.
    pub fn for_date(dataset: &PersonDataset, date: NaiveDate, count: usize) -> Self {
        Self {
            date,
            matchups: generate(dataset.people(), date, count),
        }
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Correct answers in matchup order.
    pub fn older_ids(&self) -> Vec<String> {
        self.matchups.iter().map(|m| m.older_id.clone()).collect()
    }

    /// What the signature commits to.
    pub fn payload(&self) -> SignedPayload {
        SignedPayload::new(self.date_string(), self.older_ids())
    }

    pub fn sign(&self, signer: &ChallengeSigner) -> Result<String, AgegapError> {
        signer.sign(&self.payload())
    }

    /// True when `sig` was issued for exactly this date and answer list.
    pub fn verify(&self, signer: &ChallengeSigner, sig: &str) -> bool {
        signer.verify(&self.payload(), sig)
    }

    /// Strips the answers and attaches the signature.
    pub fn to_public(&self, sig: String) -> PublicChallenge {
        PublicChallenge {
            date: self.date_string(),
            matchups: self.matchups.iter().map(PublicMatchup::from).collect(),
            sig,
        }
    }
}

/// A person as shown before answering. Birth year is included, the full
/// birth date is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPerson {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
    pub sitelinks: u32,
    pub birth_year: i32,
}

impl From<&Person> for PublicPerson {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            name: person.name.clone(),
            image: person.image.clone(),
            occupation: person.occupation.clone(),
            fun_fact: person.fun_fact.clone(),
            sitelinks: person.sitelinks,
            birth_year: person.birth_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMatchup {
    pub person_a: PublicPerson,
    pub person_b: PublicPerson,
    pub difficulty: Difficulty,
}

impl From<&Matchup> for PublicMatchup {
    fn from(matchup: &Matchup) -> Self {
        Self {
            person_a: PublicPerson::from(&matchup.person_a),
            person_b: PublicPerson::from(&matchup.person_b),
            difficulty: matchup.difficulty,
        }
    }
}

/// Response body of the daily challenge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicChallenge {
    pub date: String,
    pub matchups: Vec<PublicMatchup>,
    pub sig: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> (DailyChallenge, ChallengeSigner) {
        let dataset = PersonDataset::embedded().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        (
            DailyChallenge::for_date(&dataset, date, 10),
            ChallengeSigner::new("test-secret").unwrap(),
        )
    }

    #[test]
    fn public_form_hides_answers() {
        let (challenge, signer) = challenge();
        let sig = challenge.sign(&signer).unwrap();
        let json = serde_json::to_value(challenge.to_public(sig)).unwrap();

        assert_eq!(json["date"], "2025-11-20");
        let first = &json["matchups"][0];
        assert!(first.get("olderId").is_none());
        assert!(first.get("ageGapYears").is_none());
        assert!(first["personA"].get("birthDate").is_none());
        assert!(first["personA"]["birthYear"].is_i64());
        assert!(first["difficulty"].is_string());
    }

    #[test]
    fn issued_signature_verifies_for_same_date_only() {
        let (challenge, signer) = challenge();
        let sig = challenge.sign(&signer).unwrap();
        assert!(challenge.verify(&signer, &sig));

        let dataset = PersonDataset::embedded().unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 11, 21).unwrap();
        let other = DailyChallenge::for_date(&dataset, next_day, 10);
        assert!(!other.verify(&signer, &sig));
    }

    #[test]
    fn public_matchups_follow_issued_order() {
        let (challenge, _) = challenge();
        let public = challenge.to_public(String::new());
        for (full, shown) in challenge.matchups.iter().zip(&public.matchups) {
            assert_eq!(full.person_a.id, shown.person_a.id);
            assert_eq!(full.person_b.id, shown.person_b.id);
        }
    }
}
