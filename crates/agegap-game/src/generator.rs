// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic daily matchup generation.
//!
//! The date seeds a [`Mulberry32`] stream which shuffles the dataset. Pairs
//! are then picked bucket by bucket (hard, medium, easy by birth-year gap),
//! leftovers are paired greedily if the buckets came up short, and finally
//! one draw per matchup decides whether the two sides swap places.

use agegap_core::{Difficulty, Matchup, Person};
use chrono::{Datelike, NaiveDate};

use crate::rng::{Mulberry32, shuffle};

/// A difficulty band over absolute birth-year gaps, `min_gap..max_gap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub difficulty: Difficulty,
    pub min_gap: u32,
    pub max_gap: u32,
    pub target: usize,
}

impl Bucket {
    fn accepts(&self, gap: u32) -> bool {
        gap >= self.min_gap && gap < self.max_gap
    }
}

/// Buckets in scan order with per-bucket targets for `count` matchups.
///
/// Hard and easy each get 30% (rounded down); medium takes the rest.
pub fn buckets(count: usize) -> [Bucket; 3] {
    let hard = count * 3 / 10;
    let easy = count * 3 / 10;
    [
        Bucket {
            difficulty: Difficulty::Hard,
            min_gap: 0,
            max_gap: 4,
            target: hard,
        },
        Bucket {
            difficulty: Difficulty::Medium,
            min_gap: 4,
            max_gap: 12,
            target: count - hard - easy,
        },
        Bucket {
            difficulty: Difficulty::Easy,
            min_gap: 12,
            max_gap: 80,
            target: easy,
        },
    ]
}

/// `YYYYMMDD` read as a decimal integer, reduced modulo 2^32.
pub fn seed_for_date(date: NaiveDate) -> u32 {
    let digits =
        i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day());
    digits.rem_euclid(1 << 32) as u32
}

/// Id of the older person. Equal birth dates go to the lexically smaller id.
pub fn older_of<'a>(a: &'a Person, b: &'a Person) -> &'a str {
    match a.birth_date.cmp(&b.birth_date) {
        std::cmp::Ordering::Less => &a.id,
        std::cmp::Ordering::Greater => &b.id,
        std::cmp::Ordering::Equal => a.id.as_str().min(b.id.as_str()),
    }
}

fn age_gap(a: &Person, b: &Person) -> u32 {
    (a.birth_year - b.birth_year).unsigned_abs()
}

/// Label for pairs made after the buckets are exhausted.
fn fill_difficulty(gap: u32) -> Difficulty {
    if gap < 5 {
        Difficulty::Hard
    } else if gap > 20 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    }
}

fn pair(a: &Person, b: &Person, difficulty: Difficulty) -> Matchup {
    Matchup {
        person_a: a.clone(),
        person_b: b.clone(),
        older_id: older_of(a, b).to_string(),
        difficulty,
        age_gap_years: age_gap(a, b),
    }
}

/// Builds the matchups for `date`.
///
/// Returns at most `count` matchups; fewer when the dataset runs out of
/// unpaired people.
pub fn generate(people: &[Person], date: NaiveDate, count: usize) -> Vec<Matchup> {
    let mut rng = Mulberry32::new(seed_for_date(date));
    let mut pool: Vec<&Person> = people.iter().collect();
    shuffle(&mut pool, &mut rng);

    let mut used = vec![false; pool.len()];
    let mut matchups = Vec::with_capacity(count);

    for bucket in buckets(count) {
        let mut found = 0;
        for i in 0..pool.len() {
            if found >= bucket.target || matchups.len() >= count {
                break;
            }
            if used[i] {
                continue;
            }
            let partner = (i + 1..pool.len())
                .find(|&j| !used[j] && bucket.accepts(age_gap(pool[i], pool[j])));
            if let Some(j) = partner {
                used[i] = true;
                used[j] = true;
                matchups.push(pair(pool[i], pool[j], bucket.difficulty));
                found += 1;
            }
        }
    }

    while matchups.len() < count {
        let free: Vec<usize> = (0..pool.len()).filter(|&i| !used[i]).take(2).collect();
        let [i, j] = free[..] else {
            break;
        };
        used[i] = true;
        used[j] = true;
        let difficulty = fill_difficulty(age_gap(pool[i], pool[j]));
        matchups.push(pair(pool[i], pool[j], difficulty));
    }

    for matchup in &mut matchups {
        if rng.next_f64() > 0.5 {
            std::mem::swap(&mut matchup.person_a, &mut matchup.person_b);
        }
    }

    matchups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, date: &str) -> Person {
        let birth_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Person {
            id: id.to_string(),
            name: id.to_string(),
            birth_date,
            birth_year: birth_date.year(),
            image: String::new(),
            occupation: None,
            fun_fact: None,
            sitelinks: 0,
        }
    }

    #[test]
    fn seed_is_date_digits() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        assert_eq!(seed_for_date(date), 20251120);
    }

    #[test]
    fn bucket_targets_for_ten() {
        let targets: Vec<usize> = buckets(10).iter().map(|b| b.target).collect();
        assert_eq!(targets, vec![3, 4, 3]);
    }

    #[test]
    fn bucket_targets_sum_to_count() {
        for count in 0..=50 {
            let total: usize = buckets(count).iter().map(|b| b.target).sum();
            assert_eq!(total, count);
        }
    }

    #[test]
    fn older_by_date() {
        let a = person("Q2", "1900-05-01");
        let b = person("Q1", "1900-05-02");
        assert_eq!(older_of(&a, &b), "Q2");
        assert_eq!(older_of(&b, &a), "Q2");
    }

    #[test]
    fn tie_goes_to_smaller_id() {
        let a = person("Q9", "1950-01-01");
        let b = person("Q10", "1950-01-01");
        // Lexical, not numeric.
        assert_eq!(older_of(&a, &b), "Q10");
        assert_eq!(older_of(&b, &a), "Q10");
    }

    #[test]
    fn fill_thresholds() {
        assert_eq!(fill_difficulty(4), Difficulty::Hard);
        assert_eq!(fill_difficulty(5), Difficulty::Medium);
        assert_eq!(fill_difficulty(20), Difficulty::Medium);
        assert_eq!(fill_difficulty(21), Difficulty::Easy);
    }

    #[test]
    fn zero_count_yields_nothing() {
        let people = vec![person("Q1", "1900-01-01"), person("Q2", "1901-01-01")];
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(generate(&people, date, 0).is_empty());
    }
}
