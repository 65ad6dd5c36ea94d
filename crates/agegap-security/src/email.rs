// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email capture helpers. Raw addresses never leave this module.

use std::sync::LazyLock;

use regex::Regex;

use crate::signature::ChallengeSigner;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Longest address accepted.
const MAX_EMAIL_LEN: usize = 254;

/// Loose shape check: something, `@`, a dotted domain, no whitespace.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    email.len() <= MAX_EMAIL_LEN
        && EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(email))
}

/// Keyed hex hash of the trimmed, lowercased address.
pub fn hash_email(signer: &ChallengeSigner, email: &str) -> String {
    signer.keyed_hex(&email.trim().to_lowercase())
}

/// First two characters of the local part, masked, plus the domain.
/// Returns `"redacted"` when the address has no usable local part or domain.
pub fn email_hint(email: &str) -> String {
    let mut parts = email.trim().split('@');
    match (parts.next(), parts.next()) {
        (Some(user), Some(domain)) if !user.is_empty() && !domain.is_empty() => {
            let visible: String = user.chars().take(2).collect();
            format!("{visible}***@{domain}")
        }
        _ => "redacted".to_string(),
    }
}
