// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle: pragmas, migrations, and the shared async handle.
//!
//! Migrations run on a short-lived blocking connection before the async
//! connection is opened. After that, every statement goes through the one
//! `tokio_rusqlite::Connection`; do not open a second one for writes.

use std::path::Path;

use agegap_core::AgegapError;
use tracing::debug;

use crate::migrations::run_migrations;

/// How long a statement waits on a lock held by another process.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Converts a tokio-rusqlite failure into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AgegapError {
    AgegapError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) and migrates the database at `path`.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AgegapError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(AgegapError::storage)?;
            }
        }

        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), AgegapError> {
            let mut conn = rusqlite::Connection::open(&setup_path).map_err(AgegapError::storage)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(AgegapError::storage)?;
            }
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| AgegapError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AgegapError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(std::time::Duration::from_millis(u64::from(BUSY_TIMEOUT_MS)))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flushes the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), AgegapError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Trivial round trip used by health checks.
    pub async fn ping(&self) -> Result<(), AgegapError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)
    }
}
