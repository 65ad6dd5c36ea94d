// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The game itself: who plays, how a day's matchups are chosen, and how a
//! submission is scored.
//!
//! Everything here is pure. A challenge is a function of the dataset, the
//! date, and the matchup count, so the server regenerates it at scoring time
//! instead of trusting what the client sends back.

pub mod challenge;
pub mod dataset;
pub mod generator;
pub mod rng;
pub mod scoring;

pub use challenge::{DailyChallenge, PublicChallenge, PublicMatchup, PublicPerson};
pub use dataset::PersonDataset;
pub use generator::{generate, older_of, seed_for_date};
pub use rng::{Mulberry32, shuffle};
pub use scoring::{MatchupResult, Scorecard, score_answers};
