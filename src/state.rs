// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthGate;
use crate::config::{AuthSettings, ConfigError};

/// Shared, read-only application state.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(AuthGate::from_settings(settings)?))
    }
}
