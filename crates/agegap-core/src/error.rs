// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the agegap service.

use thiserror::Error;

/// The primary error type used across agegap crates.
///
/// Request-level rejections (bad signature, replay, throttling) are not
/// errors at this layer; they are modelled by the gateway's API error type.
#[derive(Debug, Error)]
pub enum AgegapError {
    /// Configuration errors (invalid values discovered after loading).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The person dataset is missing, unparsable, or violates an invariant.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A signing key or signature could not be processed.
    #[error("signature error: {0}")]
    Signature(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgegapError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
