// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The single authorization decision point.

use axum::http::HeaderMap;

use super::{
    extract_bearer_token, permissions::check_permissions, AuthError, ClaimSet, KeySetResolver,
    TokenVerifier,
};
use crate::config::{AuthSettings, ConfigError};

/// Outcome of an authorization check: the verified claims, or the denial.
pub type AuthDecision = Result<ClaimSet, AuthError>;

/// Runs header extraction, key resolution, verification and the permission
/// check in order, stopping at the first failure.
///
/// Shared read-only between requests; holds no per-request state.
pub struct AuthGate {
    resolver: KeySetResolver,
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(resolver: KeySetResolver, verifier: TokenVerifier) -> Self {
        Self { resolver, verifier }
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            KeySetResolver::from_settings(settings)?,
            TokenVerifier::from_settings(settings),
        ))
    }

    pub fn resolver(&self) -> &KeySetResolver {
        &self.resolver
    }

    /// Decide whether a request with `headers` may perform an operation
    /// requiring `permission`.
    #[tracing::instrument(level = "debug", skip(self, headers))]
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> AuthDecision {
        let decision = self.evaluate(headers, permission).await;

        match &decision {
            Ok(claims) => tracing::debug!(subject = ?claims.subject(), "Request authorized"),
            Err(e) => tracing::info!(code = e.code(), permission, "Request denied"),
        }

        decision
    }

    async fn evaluate(&self, headers: &HeaderMap, permission: &str) -> AuthDecision {
        let token = extract_bearer_token(headers)?;
        let key = self.resolver.resolve(&token).await?;
        let claims = self.verifier.verify(&token, &key)?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }
}
