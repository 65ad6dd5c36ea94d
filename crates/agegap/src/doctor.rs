// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agegap doctor` command implementation.
//!
//! Checks that the loaded configuration, the person dataset, the signing
//! secret, and the SQLite database are usable.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use agegap_config::model::AgegapConfig;
use agegap_core::AgegapError;
use agegap_game::{DailyChallenge, PersonDataset};
use agegap_security::ChallengeSigner;
use chrono::Utc;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `agegap doctor` command.
pub async fn run_doctor(config: &AgegapConfig, plain: bool) -> Result<(), AgegapError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_secret(config),
        check_dataset(config),
        check_signing(config),
        check_database(config).await,
    ];

    println!();
    println!("  agegap doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal().to_string()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

fn check_secret(config: &AgegapConfig) -> CheckResult {
    let start = Instant::now();
    if config.game.uses_dev_secret() {
        CheckResult::new(
            "Secret",
            CheckStatus::Warn,
            "game.secret not set, using the development secret",
            start,
        )
    } else {
        CheckResult::new("Secret", CheckStatus::Pass, "configured", start)
    }
}

fn check_dataset(config: &AgegapConfig) -> CheckResult {
    let start = Instant::now();
    let source = config.game.dataset_path.as_deref().unwrap_or("embedded");
    match PersonDataset::load(config.game.dataset_path.as_deref().map(Path::new)) {
        Ok(dataset) if dataset.len() < config.game.matchups_per_day * 2 => CheckResult::new(
            "Dataset",
            CheckStatus::Warn,
            format!(
                "{} people in {source}, fewer than {} matchups per day",
                dataset.len(),
                config.game.matchups_per_day
            ),
            start,
        ),
        Ok(dataset) => CheckResult::new(
            "Dataset",
            CheckStatus::Pass,
            format!("{} people ({source})", dataset.len()),
            start,
        ),
        Err(e) => CheckResult::new("Dataset", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Signs and verifies today's challenge.
fn check_signing(config: &AgegapConfig) -> CheckResult {
    let start = Instant::now();
    let outcome = (|| -> Result<bool, AgegapError> {
        let signer = ChallengeSigner::new(config.game.effective_secret())?;
        let dataset = PersonDataset::load(config.game.dataset_path.as_deref().map(Path::new))?;
        let challenge = DailyChallenge::for_date(
            &dataset,
            Utc::now().date_naive(),
            config.game.matchups_per_day,
        );
        let sig = challenge.sign(&signer)?;
        Ok(challenge.verify(&signer, &sig))
    })();

    match outcome {
        Ok(true) => CheckResult::new("Signing", CheckStatus::Pass, "round trip ok", start),
        Ok(false) => CheckResult::new(
            "Signing",
            CheckStatus::Fail,
            "issued signature did not verify",
            start,
        ),
        Err(e) => CheckResult::new("Signing", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Check the database file exists and answers a query.
async fn check_database(config: &AgegapConfig) -> CheckResult {
    let start = Instant::now();
    if !config.storage.enabled {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            "storage disabled, streaks and rate limits are off",
            start,
        );
    }

    let db_path = config.storage.database_path.clone();
    if !Path::new(&db_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(&db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("cannot open: {e}"),
                start,
            );
        }
    };

    let tables = conn
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                 AND name IN ('streaks', 'rate_limits', 'subscriptions')",
                [],
                |row| row.get(0),
            )
        })
        .await;

    match tables {
        Ok(3) => CheckResult::new("Database", CheckStatus::Pass, "connected", start),
        Ok(found) => CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("{found}/3 tables present (migrations run on serve)"),
            start,
        ),
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, format!("query failed: {e}"), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_secret_warns() {
        let config = AgegapConfig::default();
        assert_eq!(check_secret(&config).status, CheckStatus::Warn);

        let mut config = AgegapConfig::default();
        config.game.secret = Some("s3cret".to_string());
        assert_eq!(check_secret(&config).status, CheckStatus::Pass);
    }

    #[test]
    fn embedded_dataset_and_signing_pass() {
        let config = AgegapConfig::default();
        assert_eq!(check_dataset(&config).status, CheckStatus::Pass);
        assert_eq!(check_signing(&config).status, CheckStatus::Pass);
    }

    #[test]
    fn missing_dataset_fails() {
        let mut config = AgegapConfig::default();
        config.game.dataset_path = Some("/nonexistent/people.json".to_string());
        assert_eq!(check_dataset(&config).status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn database_checks() {
        let mut config = AgegapConfig::default();
        config.storage.enabled = false;
        assert_eq!(check_database(&config).await.status, CheckStatus::Warn);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agegap.db");
        config.storage.enabled = true;
        config.storage.database_path = path.to_string_lossy().to_string();
        assert_eq!(check_database(&config).await.status, CheckStatus::Warn);

        let storage = agegap_storage::SqliteStorage::new(config.storage.clone());
        agegap_core::StorageAdapter::initialize(&storage).await.unwrap();
        agegap_core::StorageAdapter::close(&storage).await.unwrap();
        assert_eq!(check_database(&config).await.status, CheckStatus::Pass);
    }

    #[test]
    fn plain_output_has_tags() {
        let start = Instant::now();
        let line = format_line(
            &CheckResult::new("Dataset", CheckStatus::Fail, "broken", start),
            false,
        );
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("broken"));
    }
}
