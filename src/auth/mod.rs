// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer token authorization for the coffee shop API.
//!
//! ## Flow
//!
//! 1. Client authenticates with the identity provider (Auth0)
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. The [`AuthGate`]:
//!    - extracts the bearer token from the header
//!    - reads `kid` from the unverified token header and fetches the
//!      provider's JWKS to find the matching key
//!    - verifies the RS256 signature, `exp`, `aud` and `iss`
//!    - checks the `permissions` claim for the operation's permission
//! 4. The protected handler receives the verified [`ClaimSet`], or the
//!    client receives a 401 with a machine-readable code
//!
//! ## Security
//!
//! - Only RS256 is accepted, regardless of the token header
//! - JWKS fetches are bounded by a timeout
//! - No clock skew tolerance on `exp`
//! - Every failure becomes exactly one [`AuthError`]

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod header;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testutil;

pub use claims::ClaimSet;
pub use error::AuthError;
pub use extractor::Authorized;
pub use gate::{AuthDecision, AuthGate};
pub use header::{extract_bearer_token, BearerToken};
pub use jwks::{KeySet, KeySetResolver, SigningKey};
pub use permissions::{
    check_permissions, AnyPermission, DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission,
    PostDrinks,
};
pub use verifier::TokenVerifier;
