// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token signature and claim verification.

use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

use super::{AuthError, BearerToken, ClaimSet, SigningKey};
use crate::config::{AuthSettings, ACCEPTED_ALGORITHM};

/// Verifies tokens against a resolved signing key.
///
/// The accepted algorithm is fixed to RS256; whatever the token header
/// claims is only compared against it.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    validation: Validation,
}

impl TokenVerifier {
    /// Accept tokens for `audience` issued by `issuer`.
    pub fn new(audience: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(ACCEPTED_ALGORITHM);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        // Absent `aud` or `iss` must fail, not skip the comparison.
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        // `exp` strictly in the past means expired.
        validation.leeway = 0;

        Self { validation }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.audience, &settings.issuer())
    }

    /// Check signature, expiry, audience and issuer, returning the payload.
    pub fn verify(&self, token: &BearerToken, key: &SigningKey) -> Result<ClaimSet, AuthError> {
        if key.key_type != "RSA" {
            tracing::debug!(kid = %key.key_id, kty = %key.key_type, "Signing key is not an RSA key");
            return Err(AuthError::InvalidHeader);
        }

        let decoding_key = DecodingKey::from_rsa_components(&key.modulus, &key.exponent)
            .map_err(|e| {
                tracing::debug!(kid = %key.key_id, error = %e, "Unusable RSA key components");
                AuthError::InvalidHeader
            })?;

        decode::<ClaimSet>(token.as_str(), &decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                classify(e.kind())
            })
    }
}

/// Map a verification failure onto the denial taxonomy.
fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        // Bad structure, base64, JSON, signature mismatch, disallowed algorithm.
        _ => AuthError::InvalidHeader,
    }
}
