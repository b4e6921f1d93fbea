// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;

use coffee_shop_auth::{
    api::router,
    config::{
        bind_address, AuthSettings, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, HOST_ENV,
        LOG_FORMAT_ENV, PORT_ENV,
    },
    state::AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = match AuthSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        domain = %settings.domain,
        audience = %settings.audience,
        jwks_url = %settings.jwks_url,
        cache_ttl_secs = settings.jwks_cache_ttl.map(|ttl| ttl.as_secs()),
        max_stale_secs = settings.jwks_max_stale.as_secs(),
        "Loaded auth settings"
    );

    let state = match AppState::from_settings(&settings) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize auth gate");
            std::process::exit(1);
        }
    };
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = match bind_address(&host, port) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "Invalid bind address");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "Coffee shop auth listening (docs at /docs)");

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        tracing::error!(error = %e, "HTTP server failed");
        std::process::exit(1);
    }
}
