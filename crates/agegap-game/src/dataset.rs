// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The static person dataset.
//!
//! Loaded once at startup, validated, then shared read-only. Order matters:
//! the generator shuffles the list as given, so reordering the file changes
//! every challenge.

use std::collections::HashMap;
use std::path::Path;

use agegap_core::{AgegapError, Person};
use chrono::Datelike;
use tracing::debug;

const EMBEDDED: &str = include_str!("../data/people.json");

/// Validated, ordered list of people with an id index.
#[derive(Debug, Clone)]
pub struct PersonDataset {
    people: Vec<Person>,
    index: HashMap<String, usize>,
}

impl PersonDataset {
    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, AgegapError> {
        Self::from_json(EMBEDDED)
    }

    /// Parses and validates a JSON array of people.
    pub fn from_json(json: &str) -> Result<Self, AgegapError> {
        let people: Vec<Person> = serde_json::from_str(json)
            .map_err(|e| AgegapError::Dataset(format!("invalid dataset JSON: {e}")))?;
        Self::new(people)
    }

    /// Reads a dataset file.
    pub fn from_path(path: &Path) -> Result<Self, AgegapError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AgegapError::Dataset(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Loads from `path` when given, otherwise the embedded dataset.
    pub fn load(path: Option<&Path>) -> Result<Self, AgegapError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// Validates ids, names, and birth years.
    pub fn new(people: Vec<Person>) -> Result<Self, AgegapError> {
        let mut index = HashMap::with_capacity(people.len());
        for (position, person) in people.iter().enumerate() {
            if person.id.trim().is_empty() {
                return Err(AgegapError::Dataset(format!(
                    "entry {position} has an empty id"
                )));
            }
            if person.name.trim().is_empty() {
                return Err(AgegapError::Dataset(format!(
                    "{} has an empty name",
                    person.id
                )));
            }
            if person.birth_year != person.birth_date.year() {
                return Err(AgegapError::Dataset(format!(
                    "{} has birthYear {} but birthDate {}",
                    person.id, person.birth_year, person.birth_date
                )));
            }
            if index.insert(person.id.clone(), position).is_some() {
                return Err(AgegapError::Dataset(format!(
                    "duplicate id {}",
                    person.id
                )));
            }
        }
        debug!(people = people.len(), "person dataset loaded");
        Ok(Self { people, index })
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.people[i])
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, date: &str, year: i32) -> String {
        format!(
            r#"{{"id":"{id}","name":"{name}","birthDate":"{date}","birthYear":{year},"image":"https://example.org/{id}.jpg","sitelinks":1}}"#
        )
    }

    fn array(entries: &[String]) -> String {
        format!("[{}]", entries.join(","))
    }

    #[test]
    fn embedded_dataset_is_valid() {
        let dataset = PersonDataset::embedded().unwrap();
        assert!(dataset.len() >= 20);
        let obama = dataset.get("Q76").unwrap();
        assert_eq!(obama.name, "Barack Obama");
        assert_eq!(obama.birth_year, 1961);
    }

    #[test]
    fn lookup_misses_unknown_id() {
        let dataset = PersonDataset::embedded().unwrap();
        assert!(dataset.get("Q0").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = array(&[
            entry("Q1", "A", "1900-01-01", 1900),
            entry("Q1", "B", "1910-01-01", 1910),
        ]);
        let err = PersonDataset::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate id Q1"));
    }

    #[test]
    fn inconsistent_birth_year_rejected() {
        let json = array(&[entry("Q1", "A", "1900-01-01", 1901)]);
        assert!(matches!(
            PersonDataset::from_json(&json),
            Err(AgegapError::Dataset(_))
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let json = array(&[entry("Q1", " ", "1900-01-01", 1900)]);
        assert!(PersonDataset::from_json(&json).is_err());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(PersonDataset::from_json("{not json").is_err());
    }

    #[test]
    fn missing_file_is_a_dataset_error() {
        let err = PersonDataset::from_path(Path::new("/nonexistent/people.json")).unwrap_err();
        assert!(matches!(err, AgegapError::Dataset(_)));
    }
}
