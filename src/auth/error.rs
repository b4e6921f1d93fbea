// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.
//!
//! Every failure inside the authorization pipeline is converted into exactly
//! one [`AuthError`] at the point where it happens. Raw transport, parse and
//! crypto errors are logged at their origin and never leave the `auth` module.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authorization denial.
///
/// All variants are reported as `401 Unauthorized`; clients tell them apart
/// through [`AuthError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header present
    #[error("Authorization header is expected.")]
    MissingHeader,
    /// Header present but not `Bearer <token>`
    #[error("Authorization header must be a bearer token.")]
    MalformedHeader,
    /// Token could not be parsed or its signature could not be verified
    #[error("Unable to parse authentication token.")]
    InvalidHeader,
    /// No key in the provider key set matches the token's `kid`,
    /// or the key set could not be fetched
    #[error("Unable to find the appropriate key.")]
    KeyNotFound,
    /// `exp` is in the past
    #[error("Token expired.")]
    TokenExpired,
    /// Audience or issuer mismatch
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    /// Token carries no `permissions` collection
    #[error("Permissions are not included in the payload.")]
    InvalidPayload,
    /// Required permission not granted
    #[error("The requested permission is not in the payload.")]
    InsufficientPermission,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::KeyNotFound => "key_not_found",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::InvalidPayload => "invalid_payload",
            AuthError::InsufficientPermission => "insufficient_permission",
        }
    }

    /// Human-readable description (same text as `Display`).
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// HTTP status for this error.
    ///
    /// The resource API never distinguishes "not authenticated" from
    /// "not authorized" by status.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
