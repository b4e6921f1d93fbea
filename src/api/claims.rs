// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token introspection for API clients.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AnyPermission, Authorized, ClaimSet};

#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimsResponse {
    pub success: bool,
    /// Verified payload of the presented token.
    pub claims: ClaimSet,
}

/// Return the verified claims of the caller's token.
///
/// Accepts any valid token that carries a `permissions` claim, which makes
/// it useful for checking how the provider is configured.
#[utoipa::path(
    get,
    path = "/v1/claims",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ClaimsResponse),
        (status = 401, description = "Token missing, invalid or without permissions", body = crate::error::ErrorBody)
    )
)]
pub async fn get_claims(auth: Authorized<AnyPermission>) -> Json<ClaimsResponse> {
    Json(ClaimsResponse {
        success: true,
        claims: auth.claims,
    })
}
