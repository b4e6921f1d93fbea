// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for permission-protected handlers.
//!
//! A handler declares the permission it needs in its signature; the
//! extractor runs the [`AuthGate`] before the handler body, and the handler
//! receives the verified claims as an ordinary argument:
//!
//! ```rust,ignore
//! async fn create_drink(
//!     Authorized { claims, .. }: Authorized<PostDrinks>,
//!     Json(body): Json<NewDrink>,
//! ) -> Result<Json<Drink>, ApiError> {
//!     // only reached when the token carries `post:drinks`
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{AuthGate, ClaimSet, Permission};
use crate::error::ApiError;

/// Verified claims of a request holding permission `P`.
///
/// Rejection renders the denial through [`ApiError`].
pub struct Authorized<P: Permission> {
    pub claims: ClaimSet,
    pub permission: PhantomData<P>,
}

impl<P, S> FromRequestParts<S> for Authorized<P>
where
    P: Permission,
    S: Send + Sync,
    Arc<AuthGate>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AuthGate>::from_ref(state);
        let claims = gate.authorize(&parts.headers, P::NAME).await?;

        Ok(Self {
            claims,
            permission: PhantomData,
        })
    }
}
