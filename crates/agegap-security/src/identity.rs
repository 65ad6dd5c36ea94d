// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pseudonymous client identity.
//!
//! A client that sends its own id keeps it verbatim. Otherwise the id is a
//! keyed hash of `"{ip}|{user-agent}"`. That fingerprint is coarse: clients
//! sharing an address and browser build collide and share a streak.

use agegap_core::ClientId;

use crate::signature::ChallengeSigner;

/// Address used when no address header is present.
pub const UNKNOWN_ADDRESS: &str = "0.0.0.0";

/// User agent used when the header is absent.
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// Connection signals used for fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    pub ip: String,
    pub user_agent: String,
}

impl RequestMetadata {
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Builds metadata from request headers.
    ///
    /// The address comes from `ip_header`, then the first hop of
    /// `x-forwarded-for`, then `x-real-ip`. `header` returns the value of a
    /// header by lowercase name.
    pub fn from_headers<F>(ip_header: &str, header: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: String| {
            let trimmed = v.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        };

        let ip = header(&ip_header.to_ascii_lowercase())
            .and_then(non_empty)
            .or_else(|| {
                header("x-forwarded-for")
                    .and_then(|v| v.split(',').next().map(str::to_string))
                    .and_then(non_empty)
            })
            .or_else(|| header("x-real-ip").and_then(non_empty))
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

        let user_agent = header("user-agent")
            .and_then(non_empty)
            .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string());

        Self { ip, user_agent }
    }
}

/// Resolves the identity for a request.
pub fn derive_client_id(
    signer: &ChallengeSigner,
    metadata: &RequestMetadata,
    provided: Option<&str>,
) -> ClientId {
    match provided {
        Some(id) if !id.is_empty() => ClientId(id.to_string()),
        _ => ClientId(signer.keyed_hex(&format!(
            "{}|{}",
            metadata.ip, metadata.user_agent
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn signer() -> ChallengeSigner {
        ChallengeSigner::new("test-secret").unwrap()
    }

    #[test]
    fn provided_id_used_verbatim() {
        let meta = RequestMetadata::new("1.2.3.4", "ua");
        let id = derive_client_id(&signer(), &meta, Some("device-abc"));
        assert_eq!(id.as_str(), "device-abc");
    }

    #[test]
    fn empty_provided_id_falls_back_to_fingerprint() {
        let meta = RequestMetadata::new("203.0.113.7", "Mozilla/5.0");
        let id = derive_client_id(&signer(), &meta, Some(""));
        assert_eq!(
            id.as_str(),
            "30494450265172e3a35831112846f50d90d847efb7704164ac7ac214b22149d0"
        );
    }

    #[test]
    fn fingerprint_is_stable_and_metadata_sensitive() {
        let a = derive_client_id(&signer(), &RequestMetadata::new("1.1.1.1", "ua"), None);
        let b = derive_client_id(&signer(), &RequestMetadata::new("1.1.1.1", "ua"), None);
        let c = derive_client_id(&signer(), &RequestMetadata::new("1.1.1.2", "ua"), None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn configured_header_wins() {
        let meta = RequestMetadata::from_headers(
            "CF-Connecting-IP",
            lookup(&[
                ("cf-connecting-ip", "9.9.9.9"),
                ("x-forwarded-for", "8.8.8.8"),
                ("user-agent", "curl/8"),
            ]),
        );
        assert_eq!(meta, RequestMetadata::new("9.9.9.9", "curl/8"));
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let meta = RequestMetadata::from_headers(
            "cf-connecting-ip",
            lookup(&[("x-forwarded-for", " 10.0.0.1 , 172.16.0.1")]),
        );
        assert_eq!(meta.ip, "10.0.0.1");
    }

    #[test]
    fn real_ip_is_last_resort() {
        let meta = RequestMetadata::from_headers(
            "cf-connecting-ip",
            lookup(&[("x-real-ip", "10.1.1.1")]),
        );
        assert_eq!(meta.ip, "10.1.1.1");
    }

    #[test]
    fn missing_headers_use_placeholders() {
        let meta = RequestMetadata::from_headers("cf-connecting-ip", lookup(&[]));
        assert_eq!(meta, RequestMetadata::new(UNKNOWN_ADDRESS, UNKNOWN_USER_AGENT));
    }
}
