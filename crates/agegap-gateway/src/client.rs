// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading client signals from request headers.

use agegap_security::RequestMetadata;
use axum::http::HeaderMap;

/// Address and user agent for fingerprinting, read from `headers`.
pub fn request_metadata(headers: &HeaderMap, ip_header: &str) -> RequestMetadata {
    RequestMetadata::from_headers(ip_header, |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}
