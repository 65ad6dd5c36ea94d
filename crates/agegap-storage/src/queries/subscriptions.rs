// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email capture rows.

use agegap_core::{AgegapError, Subscription};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Inserts unless the hash already exists. Returns whether a row was added.
pub async fn insert_subscription(
    db: &Database,
    subscription: &Subscription,
) -> Result<bool, AgegapError> {
    let sub = subscription.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO subscriptions (email_hash, email_hint, created_at)
                 VALUES (?1, ?2, ?3)",
                params![sub.email_hash, sub.email_hint, sub.created_at],
            )?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_subscriptions(db: &Database) -> Result<i64, AgegapError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn duplicate_hash_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subs.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let sub = Subscription {
            email_hash: "abc".to_string(),
            email_hint: "jo***@example.com".to_string(),
            created_at: "2025-11-20T00:00:00.000Z".to_string(),
        };
        assert!(insert_subscription(&db, &sub).await.unwrap());
        assert!(!insert_subscription(&db, &sub).await.unwrap());
        assert_eq!(count_subscriptions(&db).await.unwrap(), 1);
    }
}
