// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for agegap.
//!
//! One `tokio-rusqlite` connection serializes every statement on a single
//! background thread. Rate-limit counting is a single upsert statement and
//! streak updates run inside an immediate transaction, so concurrent
//! requests for the same client cannot lose updates.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
