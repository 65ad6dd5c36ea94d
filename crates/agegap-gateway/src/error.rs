// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-level failures and their HTTP mapping.
//!
//! | Variant          | Status |
//! |------------------|--------|
//! | `Validation`     | 400    |
//! | `Authenticity`   | 403    |
//! | `NotFound`       | 404    |
//! | `AlreadyPlayed`  | 409    |
//! | `Throttled`      | 429 + `Retry-After` |
//! | `Internal`       | 500, details only logged |

use agegap_core::AgegapError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request shape or values.
    #[error("{0}")]
    Validation(String),

    /// Signature does not match the regenerated challenge.
    #[error("Invalid signature")]
    Authenticity,

    #[error("{0}")]
    NotFound(String),

    /// The client already has a scored play for the date.
    #[error("You already played today. Come back tomorrow.")]
    AlreadyPlayed,

    #[error("Too many attempts. Try again soon.")]
    Throttled { retry_after_secs: u64 },

    #[error(transparent)]
    Internal(#[from] AgegapError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authenticity => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyPlayed => StatusCode::CONFLICT,
            Self::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                "Error processing request".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if let Self::Throttled { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
