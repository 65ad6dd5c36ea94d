// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window request counters.

use agegap_core::AgegapError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Counts one request and returns the count for the current window.
///
/// A row from an older window is reset to 1 in the same statement, so
/// concurrent callers never read a stale count and write it back.
pub async fn increment_window(
    db: &Database,
    client_id: &str,
    window_start: i64,
) -> Result<u32, AgegapError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            conn.query_row(
                "INSERT INTO rate_limits (client_id, window_start, count) VALUES (?1, ?2, 1)
                 ON CONFLICT(client_id) DO UPDATE SET
                     count = CASE WHEN rate_limits.window_start = excluded.window_start
                                  THEN rate_limits.count + 1 ELSE 1 END,
                     window_start = excluded.window_start
                 RETURNING count",
                params![client_id, window_start],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
