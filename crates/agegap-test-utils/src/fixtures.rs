// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures.

use agegap_core::Person;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Secret every harness signs with.
pub const TEST_SECRET: &str = "test-secret";

/// The date the golden matchup list was recorded for.
pub fn golden_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).unwrap_or_default()
}

/// Noon UTC on the golden date.
pub fn golden_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds a person born on `birth` (`YYYY-MM-DD`).
///
/// # Panics
///
/// Panics if `birth` is not a valid date.
pub fn person(id: &str, name: &str, birth: &str) -> Person {
    let birth_date = NaiveDate::parse_from_str(birth, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad fixture date {birth}: {e}"));
    Person {
        id: id.to_string(),
        name: name.to_string(),
        birth_date,
        birth_year: birth_date.year(),
        image: format!("http://commons.wikimedia.org/wiki/Special:FilePath/{id}.jpg"),
        occupation: None,
        fun_fact: None,
        sitelinks: 10,
    }
}

/// Six people spread across every difficulty bucket.
pub fn small_people() -> Vec<Person> {
    vec![
        person("Q1", "Ada", "1900-01-01"),
        person("Q2", "Bo", "1902-06-15"),
        person("Q3", "Cy", "1910-03-03"),
        person("Q4", "Di", "1930-12-31"),
        person("Q5", "Ed", "1931-07-04"),
        person("Q6", "Flo", "1960-02-29"),
    ]
}
