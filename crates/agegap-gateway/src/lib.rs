// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the agegap daily game.
//!
//! Serves the daily challenge, scores signed submissions, and exposes
//! streak, subscription, client error and image endpoints over axum.

pub mod client;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{AppState, Clock, GatewaySettings, router, start_server};
