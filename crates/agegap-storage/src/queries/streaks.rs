// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streak rows and the transactional play recorder.

use agegap_core::types::DATE_FORMAT;
use agegap_core::{AgegapError, PlayOutcome, StreakRecord, StreakSummary, streak};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, TransactionBehavior, params};

use crate::database::{Database, map_tr_err};

const SELECT_STREAK: &str = "SELECT client_id, last_date, streak, best_streak, updated_at
     FROM streaks WHERE client_id = ?1";

fn row_to_record(row: &Row<'_>) -> Result<StreakRecord, rusqlite::Error> {
    let last_date: String = row.get(1)?;
    let last_played_date = NaiveDate::parse_from_str(&last_date, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(StreakRecord {
        client_id: row.get(0)?,
        last_played_date,
        current_streak: row.get(2)?,
        best_streak: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub async fn get_streak(db: &Database, client_id: &str) -> Result<Option<StreakRecord>, AgegapError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<StreakRecord>, rusqlite::Error> {
            conn.query_row(SELECT_STREAK, params![client_id], row_to_record)
                .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Records a scored play for `date`.
///
/// The read, the same-day check, and the write share one `IMMEDIATE`
/// transaction, so of two racing submissions for the same day exactly one
/// is recorded and the other sees [`PlayOutcome::AlreadyPlayed`].
pub async fn record_play(
    db: &Database,
    client_id: &str,
    date: NaiveDate,
    perfect: bool,
    updated_at: String,
) -> Result<PlayOutcome, AgegapError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| -> Result<PlayOutcome, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let prior = tx
                .query_row(SELECT_STREAK, params![client_id], row_to_record)
                .optional()?;
            if prior.as_ref().is_some_and(|p| p.last_played_date == date) {
                return Ok(PlayOutcome::AlreadyPlayed);
            }

            let next = streak::advance(prior.as_ref(), &client_id, date, perfect, updated_at);
            tx.execute(
                "INSERT INTO streaks (client_id, last_date, streak, best_streak, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(client_id) DO UPDATE SET
                     last_date = excluded.last_date,
                     streak = excluded.streak,
                     best_streak = excluded.best_streak,
                     updated_at = excluded.updated_at",
                params![
                    next.client_id,
                    next.last_played_date.format(DATE_FORMAT).to_string(),
                    next.current_streak,
                    next.best_streak,
                    next.updated_at,
                ],
            )?;
            tx.commit()?;

            Ok(PlayOutcome::Recorded(StreakSummary::from(&next)))
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    async fn open(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("streaks.db");
        Database::open(path.to_str().unwrap(), true).await.unwrap()
    }

    async fn play(db: &Database, d: u32, perfect: bool) -> PlayOutcome {
        record_play(db, "client", day(d), perfect, "t".to_string())
            .await
            .unwrap()
    }

    fn summary(streak: u32, best: u32, d: u32) -> PlayOutcome {
        PlayOutcome::Recorded(StreakSummary {
            streak,
            best,
            last_date: Some(day(d)),
        })
    }

    #[tokio::test]
    async fn unknown_client_has_no_streak() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        assert!(get_streak(&db, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn four_day_sequence_persists() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        assert_eq!(play(&db, 1, true).await, summary(1, 1, 1));
        assert_eq!(play(&db, 2, true).await, summary(2, 2, 2));
        assert_eq!(play(&db, 4, true).await, summary(1, 2, 4));
        assert_eq!(play(&db, 5, false).await, summary(0, 2, 5));

        let stored = get_streak(&db, "client").await.unwrap().unwrap();
        assert_eq!(stored.last_played_date, day(5));
        assert_eq!((stored.current_streak, stored.best_streak), (0, 2));
    }

    #[tokio::test]
    async fn same_day_replay_is_rejected_without_writing() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        play(&db, 1, true).await;
        play(&db, 2, true).await;
        assert_eq!(play(&db, 2, false).await, PlayOutcome::AlreadyPlayed);

        let stored = get_streak(&db, "client").await.unwrap().unwrap();
        assert_eq!((stored.current_streak, stored.best_streak), (2, 2));
    }

    #[tokio::test]
    async fn concurrent_same_day_plays_record_once() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        let tasks = (0..10).map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                record_play(&db, "racer", day(3), true, "t".to_string())
                    .await
                    .unwrap()
            })
        });
        let outcomes: Vec<PlayOutcome> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let recorded = outcomes
            .iter()
            .filter(|o| matches!(o, PlayOutcome::Recorded(_)))
            .count();
        assert_eq!(recorded, 1);
        let stored = get_streak(&db, "racer").await.unwrap().unwrap();
        assert_eq!(stored.current_streak, 1);
    }
}
