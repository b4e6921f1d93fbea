// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Decoded claims of a verified token.
///
/// Holds the full payload as delivered by the identity provider. Standard
/// claims are exposed through accessors; anything else is reachable via
/// [`ClaimSet::get`]. Lives only as long as the request being authorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Look up an arbitrary claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The `iss` claim.
    pub fn issuer(&self) -> Option<&str> {
        self.0.get("iss").and_then(Value::as_str)
    }

    /// The `sub` claim.
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// The `aud` claim. A single string and a list are both accepted.
    pub fn audience(&self) -> Vec<&str> {
        match self.0.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(auds)) => auds.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// The `exp` claim as a timestamp.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let exp = self.0.get("exp")?;
        let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }

    /// The `permissions` collection.
    ///
    /// `None` when the claim is absent or not a list. Non-string entries
    /// are skipped.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        match self.0.get("permissions") {
            Some(Value::Array(items)) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// The raw payload.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
