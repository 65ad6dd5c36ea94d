// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed-hash primitives for agegap.
//!
//! - [`signature`]: HMAC-SHA256 signer binding a date to its answer ids
//! - [`identity`]: pseudonymous client identity from a token or request metadata
//! - [`email`]: address validation, keyed hashing, and display hints

pub mod email;
pub mod identity;
pub mod signature;

pub use email::{email_hint, hash_email, is_plausible_email};
pub use identity::{RequestMetadata, derive_client_id};
pub use signature::{ChallengeSigner, SignedPayload};
