// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks.
//!
//! Permissions are opaque strings carried in the token's `permissions`
//! claim. Matching is exact and case-sensitive; there is no hierarchy and
//! no wildcard.

use super::{AuthError, ClaimSet};

/// Confirm that `claims` grants `permission`.
///
/// The `permissions` claim must be present even when `permission` is empty:
/// an endpoint with no specific scope still requires a token minted with
/// permissions enabled.
pub fn check_permissions(permission: &str, claims: &ClaimSet) -> Result<(), AuthError> {
    let granted = claims.permissions().ok_or(AuthError::InvalidPayload)?;

    if permission.is_empty() || granted.contains(&permission) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermission)
    }
}

/// A permission required by a protected operation.
///
/// Implemented by zero-sized markers so the requirement is part of the
/// handler's signature (see [`super::Authorized`]).
pub trait Permission: Send + Sync + 'static {
    /// The exact string expected in the `permissions` claim.
    const NAME: &'static str;
}

macro_rules! permission {
    ($(#[$doc:meta])* $marker:ident => $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Permission for $marker {
            const NAME: &'static str = $name;
        }
    };
}

permission!(
    /// Any token carrying a `permissions` claim.
    AnyPermission => ""
);
permission!(
    /// Read the detailed drink representation.
    GetDrinksDetail => "get:drinks-detail"
);
permission!(
    /// Create drinks.
    PostDrinks => "post:drinks"
);
permission!(
    /// Update drinks.
    PatchDrinks => "patch:drinks"
);
permission!(
    /// Delete drinks.
    DeleteDrinks => "delete:drinks"
);
