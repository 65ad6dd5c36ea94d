// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 challenge signatures.
//!
//! The signed message is the compact JSON `{"date":"YYYY-MM-DD","olderIds":[..]}`
//! with fields in that order. The signature is the MAC encoded as standard
//! base64. Anything that fails to decode or verify is a mismatch.

use agegap_core::AgegapError;
use base64::{Engine as _, engine::general_purpose::STANDARD as Base64};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The facts a challenge signature commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayload {
    pub date: String,
    pub older_ids: Vec<String>,
}

impl SignedPayload {
    pub fn new(date: impl Into<String>, older_ids: Vec<String>) -> Self {
        Self {
            date: date.into(),
            older_ids,
        }
    }

    /// Byte-stable serialization that is signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, AgegapError> {
        serde_json::to_vec(self)
            .map_err(|e| AgegapError::Signature(format!("failed to encode payload: {e}")))
    }
}

/// Signs and verifies challenge payloads with a server secret.
#[derive(Clone)]
pub struct ChallengeSigner {
    keyed: HmacSha256,
}

impl std::fmt::Debug for ChallengeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl ChallengeSigner {
    /// Creates a signer. The secret must not be empty.
    pub fn new(secret: &str) -> Result<Self, AgegapError> {
        if secret.is_empty() {
            return Err(AgegapError::Signature(
                "signing secret must not be empty".to_string(),
            ));
        }
        let keyed = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .map_err(|e| AgegapError::Signature(format!("invalid signing key: {e}")))?;
        Ok(Self { keyed })
    }

    /// Raw MAC over `message`.
    pub fn sign_bytes(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.keyed.clone();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Checks a raw MAC over `message`.
    pub fn verify_bytes(&self, message: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.keyed.clone();
        mac.update(message);
        mac.verify_slice(tag).is_ok()
    }

    /// Lowercase hex MAC over `input`, used for fingerprints and email hashes.
    pub fn keyed_hex(&self, input: &str) -> String {
        hex::encode(self.sign_bytes(input.as_bytes()))
    }

    /// Base64 signature for a challenge payload.
    pub fn sign(&self, payload: &SignedPayload) -> Result<String, AgegapError> {
        let bytes = payload.canonical_bytes()?;
        Ok(Base64.encode(self.sign_bytes(&bytes)))
    }

    /// True only when `signature` is a valid base64 MAC for `payload`.
    pub fn verify(&self, payload: &SignedPayload, signature: &str) -> bool {
        let Ok(bytes) = payload.canonical_bytes() else {
            return false;
        };
        match Base64.decode(signature) {
            Ok(tag) => self.verify_bytes(&bytes, &tag),
            Err(_) => false,
        }
    }
}
