// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop Auth - bearer token authorization for the coffee shop API
//!
//! This crate decides whether a request may perform a protected operation:
//! it validates a provider-issued JWT against the provider's published key
//! set and checks that the token grants the operation's permission.
//!
//! ## Modules
//!
//! - `api` - HTTP routes (Axum): health probes, token introspection, docs
//! - `auth` - The authorization pipeline and its extractor
//! - `config` - Environment-driven settings
//! - `error` - Boundary error rendering

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
