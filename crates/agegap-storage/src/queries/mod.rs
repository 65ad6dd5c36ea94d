// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed statements, one module per table.

pub mod rate_limits;
pub mod streaks;
pub mod subscriptions;
