// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `Authorization` header parsing.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Raw bearer credential taken from the `Authorization` header.
///
/// Opaque until decoded by the verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a credential obtained some other way than an HTTP header.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print credentials.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Extract the bearer token from a request's headers.
///
/// The header must split on whitespace into exactly two parts, the first
/// being `Bearer` (any case). Nothing about the token itself is checked here.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<BearerToken, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let parts: Vec<&str> = value.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(BearerToken((*token).to_string()))
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
