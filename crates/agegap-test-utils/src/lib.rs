// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for agegap integration tests.
//!
//! # Components
//!
//! - [`MemoryStorage`] - In-memory `StorageAdapter` with failure injection
//! - [`TestHarness`] - Router over a pinned clock, driven with `oneshot`
//! - [`fixtures`] - Small hand-built people and the golden test date

pub mod fixtures;
pub mod harness;
pub mod memory;

pub use harness::{StorageKind, TestHarness, TestResponse};
pub use memory::MemoryStorage;
