// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoring a submitted answer list against regenerated matchups.

use agegap_core::{Matchup, Person};
use serde::{Deserialize, Serialize};

/// Outcome of one matchup, with both people in full so the client can
/// reveal birth dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupResult {
    pub correct: bool,
    pub correct_id: String,
    pub person_a: Person,
    pub person_b: Person,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: usize,
    pub total: usize,
    pub results: Vec<MatchupResult>,
}

impl Scorecard {
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

/// Compares `answers[i]` with `matchups[i].older_id`. A missing answer is wrong.
pub fn score_answers(matchups: &[Matchup], answers: &[String]) -> Scorecard {
    let results: Vec<MatchupResult> = matchups
        .iter()
        .enumerate()
        .map(|(i, m)| MatchupResult {
            correct: answers.get(i).is_some_and(|a| *a == m.older_id),
            correct_id: m.older_id.clone(),
            person_a: m.person_a.clone(),
            person_b: m.person_b.clone(),
        })
        .collect();

    Scorecard {
        score: results.iter().filter(|r| r.correct).count(),
        total: matchups.len(),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DailyChallenge, PersonDataset};
    use chrono::NaiveDate;

    fn matchups() -> Vec<Matchup> {
        let dataset = PersonDataset::embedded().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        DailyChallenge::for_date(&dataset, date, 10).matchups
    }

    #[test]
    fn all_correct_is_perfect() {
        let matchups = matchups();
        let answers: Vec<String> = matchups.iter().map(|m| m.older_id.clone()).collect();
        let card = score_answers(&matchups, &answers);
        assert_eq!((card.score, card.total), (10, 10));
        assert!(card.is_perfect());
        assert!(card.results.iter().all(|r| r.correct));
    }

    #[test]
    fn one_wrong_answer_breaks_perfection() {
        let matchups = matchups();
        let mut answers: Vec<String> = matchups.iter().map(|m| m.older_id.clone()).collect();
        let first = &matchups[0];
        answers[0] = if first.older_id == first.person_a.id {
            first.person_b.id.clone()
        } else {
            first.person_a.id.clone()
        };
        let card = score_answers(&matchups, &answers);
        assert_eq!(card.score, 9);
        assert!(!card.is_perfect());
        assert!(!card.results[0].correct);
        assert_eq!(card.results[0].correct_id, first.older_id);
    }

    #[test]
    fn results_serialize_camel_case_with_birth_dates() {
        let matchups = matchups();
        let card = score_answers(&matchups, &[]);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["score"], 0);
        assert!(json["results"][0]["correctId"].is_string());
        assert!(json["results"][0]["personA"]["birthDate"].is_string());
    }
}
